use thiserror::Error as ThisError;

/// Enum listing possible errors from mysql_dut.
#[derive(Clone, Debug, Eq, PartialEq, Hash, ThisError)]
pub enum Error {
    /// The connection string could not be parsed.
    #[error("malformed connection string: {0}")]
    Parse(#[from] ParseError),
    /// The server rejected the handshake. Holds the native message.
    #[error("{0}")]
    Connection(String),
    /// The server answered a statement with an error. Holds the native message.
    #[error("{0}")]
    Execution(String),
    /// The session was already closed.
    #[error("session is closed")]
    SessionClosed,
}

/// Reasons a connection string is rejected.
#[derive(Clone, Debug, Eq, PartialEq, Hash, ThisError)]
pub enum ParseError {
    #[error("unterminated quoted value")]
    UnterminatedQuotedValue,
    #[error("unknown connection option: \"{0}\"")]
    UnknownConnectionOption(String),
    #[error("missing \"=\" after \"{0}\"")]
    MissingAssignment(String),
    #[error("invalid port: \"{0}\"")]
    InvalidPort(String),
}
