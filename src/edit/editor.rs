//! Image editor trait and the normalized failure type.

use crate::edit::types::{EditRequest, EncodedImage};
use crate::error::{AccessorizeError, Result};
use async_trait::async_trait;

/// Prefix of every [`EditFailure`] message.
pub const FAILURE_PREFIX: &str = "Failed to edit image";

const UNKNOWN_FAILURE: &str = "an unknown error occurred";

/// Outcome of a single [`ImageEditor::transform`] call.
pub type EditResult = std::result::Result<EncodedImage, EditFailure>;

/// A failed edit, with one display message and the structured cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EditFailure {
    message: String,
    #[source]
    cause: AccessorizeError,
}

impl EditFailure {
    /// Wraps an error under the fixed failure prefix.
    pub fn new(cause: AccessorizeError) -> Self {
        let detail = if has_blank_detail(&cause) {
            UNKNOWN_FAILURE.to_string()
        } else {
            cause.to_string()
        };
        Self {
            message: format!("{}: {}", FAILURE_PREFIX, detail),
            cause,
        }
    }

    /// The message to show the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying error.
    pub fn cause(&self) -> &AccessorizeError {
        &self.cause
    }

    /// Consumes the failure, returning the underlying error.
    pub fn into_cause(self) -> AccessorizeError {
        self.cause
    }

    /// True when the remote call succeeded but returned no image.
    pub fn is_empty_result(&self) -> bool {
        matches!(self.cause, AccessorizeError::NoImageData)
    }
}

/// True when the error's own text payload is empty.
fn has_blank_detail(cause: &AccessorizeError) -> bool {
    let detail = match cause {
        AccessorizeError::Config(s)
        | AccessorizeError::Encoding(s)
        | AccessorizeError::Auth(s)
        | AccessorizeError::ContentBlocked(s)
        | AccessorizeError::InvalidRequest(s)
        | AccessorizeError::Decode(s) => s.clone(),
        AccessorizeError::Api { message, .. } => message.clone(),
        AccessorizeError::Io(e) => e.to_string(),
        _ => return false,
    };
    detail.trim().is_empty()
}

impl From<AccessorizeError> for EditFailure {
    fn from(cause: AccessorizeError) -> Self {
        Self::new(cause)
    }
}

/// Trait for anything that can apply an instruction to an image.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Performs one edit, returning the raw error on failure.
    async fn edit(&self, request: &EditRequest) -> Result<EncodedImage>;

    /// Checks if the editor is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;

    /// Edits `image` according to `instruction`.
    ///
    /// Every failure, including a blank instruction, comes back as an
    /// [`EditFailure`]. Nothing is retried.
    async fn transform(&self, image: &EncodedImage, instruction: &str) -> EditResult {
        let outcome = match EditRequest::new(image.clone(), instruction) {
            Ok(request) => self.edit(&request).await,
            Err(e) => Err(e),
        };

        outcome.map_err(|e| {
            let failure = EditFailure::new(e);
            tracing::debug!(error = %failure, "image edit failed");
            failure
        })
    }
}
