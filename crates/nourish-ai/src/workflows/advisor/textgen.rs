//! Optional text-generation collaborator. Any failure — missing credential,
//! transport fault, or unparseable reply — routes callers onto the
//! deterministic rule-based generators with no change in response shape.

/// Outbound hook for an external text-generation service.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        system_prompt: &str,
        context: &str,
        user_message: &str,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is not configured")]
    NotConfigured,
    #[error("text generation transport failed: {0}")]
    Transport(String),
    #[error("text generation returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Default collaborator: always reports not configured, which callers treat
/// as "use the rule-based path".
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTextGenerator;

impl TextGenerator for DisabledTextGenerator {
    fn generate(&self, _: &str, _: &str, _: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}
