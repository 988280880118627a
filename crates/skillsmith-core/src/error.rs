//! Error types for the Skillsmith core

use std::fmt;
use thiserror::Error;

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Content,
    Tags,
    Credential,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "Skill name",
            Field::Content => "Content",
            Field::Tags => "Tags",
            Field::Credential => "GitHub token",
        };
        f.write_str(label)
    }
}

/// Local validation failures. Detected before any network call and never sent anywhere.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Skill name is required")]
    EmptyName,

    #[error("{field} must be at least {min} characters (currently {length})")]
    TooShort { field: Field, length: usize, min: usize },

    #[error("Skill name may only contain lowercase letters, numbers and hyphens")]
    BadFormat,

    #[error("Content is required")]
    EmptyContent,

    #[error("Invalid tags: {} (use letters, numbers and hyphens only)", .0.join(", "))]
    InvalidTags(Vec<String>),

    #[error("A GitHub token is required to publish")]
    EmptyCredential,
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmptyName | ValidationError::BadFormat => Field::Name,
            ValidationError::TooShort { field, .. } => *field,
            ValidationError::EmptyContent => Field::Content,
            ValidationError::InvalidTags(_) => Field::Tags,
            ValidationError::EmptyCredential => Field::Credential,
        }
    }
}

/// HTTP method and absolute URL of a collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: &'static str,
    pub url: String,
}

impl Endpoint {
    pub fn new(method: &'static str, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Transport and collaborator failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{endpoint} failed: connection error ({message})")]
    Connection { endpoint: Endpoint, message: String },

    #[error(
        "{endpoint} returned HTTP {status}{}",
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Status {
        endpoint: Endpoint,
        status: u16,
        message: Option<String>,
    },

    #[error("{endpoint} returned an unreadable response (HTTP {status}): {message}")]
    Decode {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },
}

impl ClientError {
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            ClientError::Connection { endpoint, .. }
            | ClientError::Status { endpoint, .. }
            | ClientError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } | ClientError::Decode { status, .. } => {
                Some(*status)
            }
            ClientError::Connection { .. } => None,
        }
    }

    /// Message reported by the service in its error body.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The service message if present, otherwise the given fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        self.service_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Publish sub-flow failures surfaced inside the publish modal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Skill is already published at {repository_url}; re-publish explicitly to overwrite")]
    AlreadyPublished { repository_url: String },

    #[error("{0}")]
    Service(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}
