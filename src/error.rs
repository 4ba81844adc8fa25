use thiserror::Error;

pub type UriResult<T> = Result<T, UriError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("Malformed percent-encoding in '{input}' at position {position}")]
    MalformedPercentEncoding { input: String, position: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for UriError {
    fn from(err: serde_yaml::Error) -> Self {
        UriError::Config(err.to_string())
    }
}
