#![deny(unsafe_code)]

/// Terminal front end for the symptom-assessment session.
///
/// Settings are resolved once at startup; the terminal loop drives `submit` and reprints the
/// transcript whenever the scroll revision advances.
pub mod settings;
pub mod terminal;
