use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CwError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid code table: {0}")]
    InvalidCodeTable(String),

    #[error("Invalid keying event: {0}")]
    InvalidEvent(String),
}

pub type Result<T> = std::result::Result<T, CwError>;
