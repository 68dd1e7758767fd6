use std::fmt;

/// Coarse classification of a [`ZoteroError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCall,
    MissingParameter,
    Transport,
    MalformedPayload,
    CredentialAbsent,
    Other,
}

#[derive(Debug)]
pub enum ZoteroError {
    /// The call name is not in the registry.
    UnknownCall(String),
    /// A template placeholder had no value.
    MissingParameter {
        call: String,
        param: String,
    },
    Transport(reqwest::Error),
    HttpStatus {
        status: u16,
        url: String,
    },
    /// An entry's embedded content is not the expected table markup.
    MalformedPayload {
        entry: String,
        message: String,
    },
    CredentialAbsent,
    /// The response body could not be read as a feed.
    Feed(String),
    InvalidUrl(url::ParseError),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl ZoteroError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZoteroError::UnknownCall(_) => ErrorKind::UnknownCall,
            ZoteroError::MissingParameter { .. } => ErrorKind::MissingParameter,
            ZoteroError::Transport(_) | ZoteroError::HttpStatus { .. } => ErrorKind::Transport,
            ZoteroError::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            ZoteroError::CredentialAbsent => ErrorKind::CredentialAbsent,
            _ => ErrorKind::Other,
        }
    }
}

impl fmt::Display for ZoteroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoteroError::UnknownCall(name) => write!(f, "Unknown API call: {}", name),
            ZoteroError::MissingParameter { call, param } => write!(
                f,
                "Missing request parameter '{}' for call '{}'",
                param, call
            ),
            ZoteroError::Transport(e) => write!(f, "Network error: {}", e),
            ZoteroError::HttpStatus { status, url } => {
                write!(f, "HTTP error (status {}) for {}", status, url)
            }
            ZoteroError::MalformedPayload { entry, message } => {
                write!(f, "Malformed content in entry '{}': {}", entry, message)
            }
            ZoteroError::CredentialAbsent => write!(f, "No Zotero user id and key configured"),
            ZoteroError::Feed(msg) => write!(f, "Feed error: {}", msg),
            ZoteroError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            ZoteroError::IoError(e) => write!(f, "IO error: {}", e),
            ZoteroError::JsonError(e) => write!(f, "JSON error: {}", e),
            ZoteroError::YamlError(e) => write!(f, "YAML error: {}", e),
            ZoteroError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ZoteroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ZoteroError::Transport(e) => Some(e),
            ZoteroError::InvalidUrl(e) => Some(e),
            ZoteroError::IoError(e) => Some(e),
            ZoteroError::JsonError(e) => Some(e),
            ZoteroError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

// The request URL carries the user key, so it is dropped from the error.
impl From<reqwest::Error> for ZoteroError {
    fn from(err: reqwest::Error) -> Self {
        ZoteroError::Transport(err.without_url())
    }
}

impl From<url::ParseError> for ZoteroError {
    fn from(err: url::ParseError) -> Self {
        ZoteroError::InvalidUrl(err)
    }
}

impl From<std::io::Error> for ZoteroError {
    fn from(err: std::io::Error) -> Self {
        ZoteroError::IoError(err)
    }
}

impl From<serde_json::Error> for ZoteroError {
    fn from(err: serde_json::Error) -> Self {
        ZoteroError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for ZoteroError {
    fn from(err: serde_yaml::Error) -> Self {
        ZoteroError::YamlError(err)
    }
}

impl From<String> for ZoteroError {
    fn from(msg: String) -> Self {
        ZoteroError::Other(msg)
    }
}

impl From<&str> for ZoteroError {
    fn from(msg: &str) -> Self {
        ZoteroError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZoteroError>;
