//! API credentials for the upstream services.

use std::fmt;

/// The three secrets a run needs.
///
/// Populated once by the credential provider and never mutated afterwards.
/// `Debug` redacts every value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    openai_token: String,
    aws_access_id: String,
    aws_access_key: String,
}

impl Credentials {
    pub fn new(
        openai_token: impl Into<String>,
        aws_access_id: impl Into<String>,
        aws_access_key: impl Into<String>,
    ) -> Self {
        Self {
            openai_token: openai_token.into(),
            aws_access_id: aws_access_id.into(),
            aws_access_key: aws_access_key.into(),
        }
    }

    /// Bearer token for the chat and image endpoints.
    pub fn openai_token(&self) -> &str {
        &self.openai_token
    }

    /// AWS access key ID used by the speech client.
    pub fn aws_access_id(&self) -> &str {
        &self.aws_access_id
    }

    /// AWS secret access key used by the speech client.
    pub fn aws_access_key(&self) -> &str {
        &self.aws_access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_token", &"[redacted]")
            .field("aws_access_id", &"[redacted]")
            .field("aws_access_key", &"[redacted]")
            .finish()
    }
}
