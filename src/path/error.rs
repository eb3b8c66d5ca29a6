use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path '{input}' does not start with '/'")]
    MissingLeadingSlash { input: String },
    #[error("path '{input}' contains control or whitespace byte 0x{byte:02x}")]
    ControlOrWhitespace { input: String, byte: u8 },
    #[error("path '{input}' has an invalid percent encoding at index {index}")]
    InvalidPercentEncoding { input: String, index: usize },
    #[error("path '{input}' contains a parent traversal segment")]
    ParentTraversal { input: String },
    #[error("path '{input}' is not valid UTF-8 after percent decoding")]
    InvalidUtf8AfterDecoding { input: String },
}

pub type PathResult<T> = Result<T, PathError>;
