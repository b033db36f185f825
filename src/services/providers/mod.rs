/// Recommendation generator abstraction
///
/// The generator is an opaque text-generation service: it receives a prompt
/// and answers with a text blob that is expected, but not guaranteed, to be
/// the recommendations JSON. Callers parse the answer defensively.
use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiGenerator;

/// Trait for text-generation backends
///
/// One call is one request/response round trip. No streaming, no partial
/// results and no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationGenerator: Send + Sync {
    /// Sends `prompt` to the model and returns its raw text answer
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Generator name for logging and debugging
    fn name(&self) -> &'static str;
}
