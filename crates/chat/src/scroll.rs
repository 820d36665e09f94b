/// Monotonic "snap to latest" token. A larger value than the last seen means scroll to end now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScrollRevision(u64);

impl ScrollRevision {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Latest published view state, delivered to presentation layers through a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollSignal {
    pub revision: ScrollRevision,
    pub transcript_len: usize,
    pub pending: bool,
}

/// Derives scroll revisions from transcript growth and pending-flag changes.
#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    last_observed: Option<(usize, bool)>,
    revision: ScrollRevision,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> ScrollRevision {
        self.revision
    }

    /// Returns a fresh revision when the length or the pending flag changed since the last call.
    pub fn observe(&mut self, transcript_len: usize, pending: bool) -> Option<ScrollRevision> {
        let key = (transcript_len, pending);
        if self.last_observed == Some(key) {
            return None;
        }

        self.last_observed = Some(key);
        self.revision = ScrollRevision(self.revision.0.saturating_add(1));
        Some(self.revision)
    }

    pub fn signal(&self, transcript_len: usize, pending: bool) -> ScrollSignal {
        ScrollSignal {
            revision: self.revision,
            transcript_len,
            pending,
        }
    }
}
