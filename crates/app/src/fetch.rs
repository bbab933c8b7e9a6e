//! Tagged fetch state with generation tokens.
//!
//! Every fetch is issued a [`Generation`]. Only the completion carrying the
//! latest generation is applied; anything older is a superseded request and is
//! dropped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happens to previously loaded data when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Keep showing the last good data.
    KeepStale,
    /// Drop everything; nothing partial survives.
    Discard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading { generation: Generation, stale: Option<T> },
    Loaded(T),
    Failed { reason: String, stale: Option<T> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer fetch was issued after this one, or none is pending.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Remote<T> {
    state: LoadState<T>,
    issued: u64,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            issued: 0,
        }
    }
}

impl<T> Remote<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, LoadState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    /// Freshly loaded data only.
    pub fn loaded(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Data to render: loaded, or the stale copy kept while loading/after a failure.
    pub fn current(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            LoadState::Loading { stale, .. } | LoadState::Failed { stale, .. } => stale.as_ref(),
            LoadState::Idle => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<Generation> {
        match self.state {
            LoadState::Loading { generation, .. } => Some(generation),
            _ => None,
        }
    }

    /// Starts a fetch, superseding any in flight. Current data is kept as stale.
    pub fn begin(&mut self) -> Generation {
        self.issued += 1;
        let generation = Generation(self.issued);
        let stale = self.take_data();
        self.state = LoadState::Loading { generation, stale };
        generation
    }

    pub fn resolve<E: fmt::Display>(
        &mut self,
        generation: Generation,
        result: Result<T, E>,
        on_error: OnError,
    ) -> Resolution {
        if self.pending() != Some(generation) {
            tracing::debug!(%generation, "Dropping superseded fetch result");
            return Resolution::Superseded;
        }
        let stale = self.take_data();
        self.state = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(e) => LoadState::Failed {
                reason: e.to_string(),
                stale: match on_error {
                    OnError::KeepStale => stale,
                    OnError::Discard => None,
                },
            },
        };
        Resolution::Applied
    }

    /// Back to `Idle`; any pending fetch becomes superseded.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.state = LoadState::Idle;
    }

    fn take_data(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, LoadState::Idle) {
            LoadState::Loaded(data) => Some(data),
            LoadState::Loading { stale, .. } | LoadState::Failed { stale, .. } => stale,
            LoadState::Idle => None,
        }
    }
}
