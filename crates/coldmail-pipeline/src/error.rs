use coldmail_apify::ApifyError;
use coldmail_core::ProductError;
use coldmail_generation::GenerationError;
use thiserror::Error;

/// Why a pipeline run produced no message.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The reference matched neither accepted shape. Nothing was fetched.
    #[error("invalid reference {raw:?}")]
    InvalidReference { raw: String, message: String },

    /// The product description was blank or too long. Nothing was fetched.
    #[error("invalid product description: {0}")]
    InvalidProduct(#[from] ProductError),

    /// The profile provider could not supply a usable profile.
    #[error("profile retrieval failed: {0}")]
    Retrieval(#[from] ApifyError),

    /// Transport, timeout, or error status from the generation service.
    #[error("generation service failed: {0}")]
    GenerationService(#[source] GenerationError),

    /// The generation service answered with nothing shaped like `{"email": ...}`.
    #[error("generation output unusable: {0}")]
    GenerationFormat(#[source] GenerationError),
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        if err.is_format() {
            PipelineError::GenerationFormat(err)
        } else {
            PipelineError::GenerationService(err)
        }
    }
}

impl PipelineError {
    /// Pipeline stage the failure belongs to: `validation`, `fetch` or `generation`.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            PipelineError::InvalidReference { .. } | PipelineError::InvalidProduct(_) => {
                "validation"
            }
            PipelineError::Retrieval(_) => "fetch",
            PipelineError::GenerationService(_) | PipelineError::GenerationFormat(_) => {
                "generation"
            }
        }
    }

    /// Message suitable for showing to the person who made the request.
    ///
    /// Distinct per failure kind, since each calls for a different next step.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::InvalidReference { message, .. } => message.clone(),
            PipelineError::InvalidProduct(ProductError::Empty) => {
                "Product description is required".to_string()
            }
            PipelineError::InvalidProduct(ProductError::TooLong { max, .. }) => {
                format!("Product description must be {max} characters or less")
            }
            PipelineError::Retrieval(err) => retrieval_message(err),
            PipelineError::GenerationService(_) => {
                "The email generation service is unavailable right now. Please try again later."
                    .to_string()
            }
            PipelineError::GenerationFormat(_) => {
                "No email was generated. Please try again.".to_string()
            }
        }
    }
}

fn retrieval_message(err: &ApifyError) -> String {
    match err {
        ApifyError::NotFound { .. } | ApifyError::InvalidReference(_) => {
            "Couldn't find that profile. Please check the URL and try again.".to_string()
        }
        _ if err.is_timeout() => {
            "The profile provider took too long to respond. Please try again later.".to_string()
        }
        ApifyError::Provider(message) => message.clone(),
        ApifyError::Normalization { .. } | ApifyError::Deserialize { .. } => {
            "Profile data could not be retrieved properly. Please ensure the profile is public."
                .to_string()
        }
        _ => "Failed to fetch profile data. Please try again later.".to_string(),
    }
}

/// Failure building the outbound clients at startup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("profile client setup failed: {0}")]
    Retrieval(#[from] ApifyError),

    #[error("generation client setup failed: {0}")]
    Generation(#[from] GenerationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_route_to_generation_format() {
        let err = PipelineError::from(GenerationError::Format("no object".to_string()));
        assert!(matches!(err, PipelineError::GenerationFormat(_)));
        assert_eq!(err.step(), "generation");
    }

    #[test]
    fn service_errors_route_to_generation_service() {
        let err = PipelineError::from(GenerationError::Service {
            status: 503,
            message: "overloaded".to_string(),
        });
        assert!(matches!(err, PipelineError::GenerationService(_)));
    }

    #[test]
    fn not_found_and_timeout_read_differently() {
        let not_found = PipelineError::from(ApifyError::NotFound {
            identifier: "unknown-co".to_string(),
        });
        let timeout = PipelineError::from(ApifyError::Timeout {
            identifier: "unknown-co".to_string(),
        });
        assert_eq!(not_found.step(), "fetch");
        assert!(not_found.user_message().contains("Couldn't find"));
        assert!(timeout.user_message().contains("too long"));
    }

    #[test]
    fn provider_message_is_passed_through() {
        let err = PipelineError::from(ApifyError::Provider("quota exhausted".to_string()));
        assert_eq!(err.user_message(), "quota exhausted");
    }

    #[test]
    fn product_errors_are_validation_step() {
        let err = PipelineError::from(ProductError::TooLong { len: 250, max: 200 });
        assert_eq!(err.step(), "validation");
        assert_eq!(
            err.user_message(),
            "Product description must be 200 characters or less"
        );
    }
}
