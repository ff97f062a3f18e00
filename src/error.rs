//! Error types and handling for `Kravinka`

use thiserror::Error;

/// Main error type for the `Kravinka` exporter
#[derive(Error, Debug)]
pub enum KravinkaError {
    /// Dataset endpoint answered with a non-success status
    #[error("Invalid response code `{status}` from `{url}`")]
    Fetch { url: String, status: u16 },

    /// Transport failure while talking to the dataset endpoint
    #[error("Network error: {message}")]
    Network { message: String },

    /// A single dataset record is missing fields or has bad coordinates
    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },

    /// Dataset body could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// GPX document could not be produced
    #[error("XML error: {message}")]
    Xml { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors (cache and output files)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl KravinkaError {
    /// Create a new fetch error for a non-success response
    pub fn fetch<S: Into<String>>(url: S, status: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status,
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new malformed record error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new XML error
    pub fn xml<S: Into<String>>(message: S) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            KravinkaError::Fetch { url, status } => {
                format!("The dataset server at {url} answered with status {status}.")
            }
            KravinkaError::Network { .. } => {
                "Unable to reach the dataset server. Please check your internet connection."
                    .to_string()
            }
            KravinkaError::MalformedRecord { message } => {
                format!("Skipped a dataset record: {message}")
            }
            KravinkaError::Parse { .. } => {
                "The dataset could not be read. Try disabling the cache to download a fresh copy."
                    .to_string()
            }
            KravinkaError::Xml { .. } => "The GPX document could not be generated.".to_string(),
            KravinkaError::Config { message } => format!("Invalid configuration: {message}"),
            KravinkaError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for KravinkaError {
    fn from(err: serde_json::Error) -> Self {
        KravinkaError::parse(err.to_string())
    }
}
