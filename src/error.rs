use thiserror::Error;

/// Errors surfaced by the order board.
///
/// `Validation` and `IndexOutOfRange` mean nothing changed. `Persistence`
/// never implies a rollback: an in-memory mutation that preceded it stands,
/// and the caller may retry with an explicit save.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BoardError {
    #[error("Order validation error: {0}")]
    Validation(String),
    #[error("Order persistence error: {0}")]
    Persistence(String),
    #[error("No order at display position {index} (board has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Menu image error: {0}")]
    Image(String),
    #[error("Terminal I/O error: {0}")]
    Io(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl BoardError {
    #[cfg(test)]
    pub fn is_persistence(&self) -> bool {
        matches!(self, BoardError::Persistence(_))
    }
}
