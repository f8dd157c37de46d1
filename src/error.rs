use thiserror::Error;

/// Main error type for kgforge
#[derive(Error, Debug)]
pub enum KgforgeError {
    /// Request validation failures (missing or empty user input)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generation service network or API errors
    #[error("Generation API error: {0}")]
    Generation(String),

    /// Structured output that does not parse even after repair, or is
    /// missing required keys
    #[error("Malformed generation output: {0}")]
    MalformedOutput(String),

    /// Graph store connection or query errors
    #[error("Graph store error: {0}")]
    GraphStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using KgforgeError
pub type Result<T> = std::result::Result<T, KgforgeError>;
