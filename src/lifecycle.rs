//! Token-guarded request lifecycle.
//!
//! Each outbound flow owns one `Idle -> Loading -> Success | Error`
//! state machine. A trigger bumps a generation counter and hands back a
//! token; only a resolution carrying the current token may land, so a
//! slow response can never overwrite the outcome of a newer trigger.

/// Observable state of one request lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T, E> {
    Idle,
    Loading,
    Success(T),
    Error(E),
}

/// Proof of a specific trigger, required to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// State machine wrapping one logical outbound request at a time.
#[derive(Debug)]
pub struct RequestLifecycle<T, E> {
    state: RequestState<T, E>,
    generation: u64,
}

impl<T, E> RequestLifecycle<T, E> {
    pub fn new() -> RequestLifecycle<T, E> {
        RequestLifecycle {
            state: RequestState::Idle,
            generation: 0,
        }
    }

    /// Enter `Loading` for a new trigger, superseding any prior state.
    ///
    /// The previous payload or message is dropped immediately, so a
    /// stale result is never observable next to a fresh loading phase.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        self.state = RequestState::Loading;
        RequestToken(self.generation)
    }

    /// Apply a terminal result for the trigger identified by `token`.
    ///
    /// Returns false and leaves the state untouched when a newer trigger
    /// has superseded the token.
    pub fn resolve(&mut self, token: RequestToken, result: Result<T, E>) -> bool {
        if token.0 != self.generation {
            tracing::debug!(
                stale = token.0,
                current = self.generation,
                "discarding stale resolution"
            );
            return false;
        }
        self.state = match result {
            Ok(payload) => RequestState::Success(payload),
            Err(error) => RequestState::Error(error),
        };
        true
    }

    /// Drive one synchronous operation through a full trigger cycle.
    pub fn run<F>(&mut self, op: F) -> &RequestState<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let token = self.begin();
        let result = op();
        self.resolve(token, result);
        &self.state
    }

    pub fn state(&self) -> &RequestState<T, E> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    /// The payload of the last trigger, when it resolved successfully.
    pub fn success(&self) -> Option<&T> {
        match &self.state {
            RequestState::Success(payload) => Some(payload),
            _ => None,
        }
    }

    /// The failure of the last trigger, when it resolved with an error.
    pub fn error(&self) -> Option<&E> {
        match &self.state {
            RequestState::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl<T, E> Default for RequestLifecycle<T, E> {
    fn default() -> RequestLifecycle<T, E> {
        RequestLifecycle::new()
    }
}
