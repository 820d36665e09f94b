#![deny(unsafe_code)]

//! Client for the remote advisory ("ask") service.
//!
//! Every exchange resolves to an [`AskOutcome`]; transport, status and decoding faults are
//! classified into [`FailureReason`] instead of escaping as errors.
mod client;
mod config;
mod error;
mod wire;

pub use client::{AskService, AskServiceClient};
pub use config::{
    AskConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_ID, ENV_PREFIX,
    LEGACY_BASE_URL_ENV,
};
pub use error::{AskError, ClientResult};
pub use futures::future::BoxFuture;
pub use wire::{
    AskAnswer, AskOutcome, AskRequest, AskResponse, DEFAULT_PLAN_ITEM_TITLE, FailureReason,
    PlanItem, ResponseUserId,
};
