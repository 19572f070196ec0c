//! Failure classes for the advisory flows.
//!
//! A flow failure is data, not a process abort: it is stored in the
//! flow's lifecycle, rendered to the user, and replaced wholesale by the
//! next trigger. Each class carries the exact message shown to the user.

use thiserror::Error;

/// What went wrong in one advisory flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Local input checks blocked the trigger; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// The request never yielded a usable response (network or non-2xx).
    #[error("{0}")]
    Transport(String),
    /// A 2xx response was missing or mangling an expected field.
    #[error("{0}")]
    Payload(String),
    /// The host could not supply a required input, such as a location.
    #[error("{0}")]
    Environment(String),
}

impl FlowError {
    /// Stable class name for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::Validation(_) => "validation",
            FlowError::Transport(_) => "transport",
            FlowError::Payload(_) => "payload",
            FlowError::Environment(_) => "environment",
        }
    }

    /// The user-facing message carried by this failure.
    pub fn message(&self) -> &str {
        match self {
            FlowError::Validation(message)
            | FlowError::Transport(message)
            | FlowError::Payload(message)
            | FlowError::Environment(message) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_carried_message() {
        let err = FlowError::Transport("Failed to fetch prediction. Please try again.".to_string());
        assert_eq!(err.to_string(), "Failed to fetch prediction. Please try again.");
        assert_eq!(err.message(), "Failed to fetch prediction. Please try again.");
    }

    #[test]
    fn kinds_name_each_class() {
        let cases = [
            (FlowError::Validation(String::new()), "validation"),
            (FlowError::Transport(String::new()), "transport"),
            (FlowError::Payload(String::new()), "payload"),
            (FlowError::Environment(String::new()), "environment"),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
        }
    }
}
