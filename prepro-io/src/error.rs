use thiserror::Error;

/// Fatal errors from parsing the input wire format. Every variant is fail-fast: the binary
/// prints a diagnostic and exits with status 1 rather than trying to recover.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Failed to match magic word '{expected}'.\nGot '{got}'.")]
    MagicWord { expected: String, got: String },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("malformed number: '{token}'")]
    MalformedNumber { token: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fatal errors writing the output wire format.
#[derive(Debug, Error)]
pub enum WriterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
