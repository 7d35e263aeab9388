//! Error types for gasket

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, GasketError>;

/// Errors produced by the generators, configuration and renderers
#[derive(Error, Debug)]
pub enum GasketError {
    /// Points and choices passed to the reverse step are not aligned
    #[error("contract violation: {points} points but {choices} choice indices")]
    LengthMismatch { points: usize, choices: usize },

    /// Reverse step called with nothing to reconstruct
    #[error("contract violation: reverse reconstruction needs at least one point")]
    EmptyTrajectory,

    /// Choice index outside {0, 1, 2}
    #[error("contract violation: choice index {choice} at position {position} is not a vertex index")]
    ChoiceOutOfRange { position: usize, choice: u8 },

    /// Parameter out of range or malformed
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Degenerate geometry
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration file could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl GasketError {
    /// True for the reverse-reconstruction contract failures
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            GasketError::LengthMismatch { .. }
                | GasketError::EmptyTrajectory
                | GasketError::ChoiceOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_kinds() {
        assert!(GasketError::EmptyTrajectory.is_contract_violation());
        assert!(GasketError::LengthMismatch { points: 2, choices: 1 }.is_contract_violation());
        assert!(!GasketError::InvalidConfiguration("n".into()).is_contract_violation());
    }

    #[test]
    fn test_display() {
        let err = GasketError::ChoiceOutOfRange { position: 4, choice: 7 };
        assert_eq!(
            err.to_string(),
            "contract violation: choice index 7 at position 4 is not a vertex index"
        );
    }
}
