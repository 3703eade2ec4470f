use core::fmt;
use std::error::Error;
use std::fmt::Display;

/// Error type for the election node and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectError {
    text: String,
    cause: String,
}

pub(crate) type Result<T> = std::result::Result<T, ElectError>;

/// Creates a failed result with the message text and an optional (may be empty) cause.
pub fn new_err<T>(text: String, cause: String) -> std::result::Result<T, ElectError> {
    Err(ElectError { text, cause })
}

impl ElectError {
    /// Error message without the cause.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for ElectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cause_word = {
            if !self.cause.is_empty() {
                " Cause: ".to_string()
            } else {
                String::new()
            }
        };
        write!(f, "{}.{}{}", self.text, cause_word, self.cause)
    }
}

impl Error for ElectError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_cause() {
        let err: Result<()> = new_err("Cannot fetch".to_string(), "timeout".to_string());

        assert_eq!(err.unwrap_err().to_string(), "Cannot fetch. Cause: timeout");
    }

    #[test]
    fn display_without_cause() {
        let err: Result<()> = new_err("Roster is full".to_string(), String::new());

        assert_eq!(err.unwrap_err().to_string(), "Roster is full.");
    }
}
