//! Proof type for user query text.
//!
//! A `QueryText` is never blank after trimming. Validation happens once, at
//! construction, so blank input can never reach the transcript or the wire.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryText(String);

#[derive(Debug, Error)]
#[error("query text must not be blank")]
pub struct BlankQueryError;

impl QueryText {
    pub fn new(value: impl Into<String>) -> Result<Self, BlankQueryError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(BlankQueryError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for QueryText {
    type Error = BlankQueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for QueryText {
    type Error = BlankQueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QueryText> for String {
    fn from(value: QueryText) -> Self {
        value.0
    }
}

impl std::ops::Deref for QueryText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for QueryText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for QueryText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
