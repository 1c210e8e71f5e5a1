use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::error::{NetError, NetResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestState {
    /// Created, nothing sent yet
    Idle,

    /// Handed to the transport
    InFlight,

    /// Terminal: a value was delivered
    Succeeded,

    /// Terminal: a classified error was delivered
    Failed,
}

impl RequestState {
    pub fn can_transition_to(&self, target: RequestState) -> bool {
        use RequestState::*;
        match (*self, target) {
            (Idle, InFlight) => true,
            // Rejected before dispatch, e.g. an invalid attachment
            (Idle, Failed) => true,

            // Progress
            (InFlight, InFlight) => true,
            (InFlight, Succeeded) => true,
            (InFlight, Failed) => true,

            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Succeeded | RequestState::Failed)
    }
}

/// Bookkeeping for one logical request, used for logging its lifecycle.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub id: String,

    pub method: String,

    pub url: String,

    pub state: RequestState,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl RequestRecord {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            method: method.into(),
            url: url.into(),
            state: RequestState::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition_to(&mut self, state: RequestState) -> NetResult<()> {
        if !self.state.can_transition_to(state) {
            return Err(NetError::InvalidState(
                format!("Cannot transition from {:?} to {:?}", self.state, state)
            ));
        }

        self.state = state;
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Moves the record along and logs the step. A rejected transition is
    /// only logged; it never changes what the caller receives.
    pub(crate) fn advance(&mut self, state: RequestState) {
        match self.transition_to(state) {
            Ok(()) => tracing::trace!(
                request_id = %self.id,
                method = %self.method,
                url = %self.url,
                state = ?self.state,
                "request state changed"
            ),
            Err(err) => tracing::warn!(request_id = %self.id, "{}", err),
        }
    }

    /// Milliseconds since the record was created
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.created_at).num_milliseconds()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}
