//! Request tickets used to match collaborator replies with the call that is still
//! wanted. A reply carrying any other id is stale and gets discarded.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of request ids, one per controller.
#[derive(Debug, Default)]
pub struct RequestCounter {
    last: u64,
}

impl RequestCounter {
    pub fn issue(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// Last message shown to the user. Success and error are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(message) | Notice::Success(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}
