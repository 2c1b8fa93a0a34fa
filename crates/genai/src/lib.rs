//! Client seam for the generative text service.
//!
//! The rest of the workspace only ever sees [`Generator::generate`]: a
//! [`GenerationRequest`] goes in, the model's text comes out, or an error
//! that [classifies](verbum_retry::Classify) as transient (quota, overload)
//! or fatal (everything else).

pub mod error;
#[cfg(feature = "gemini")]
mod gemini;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod request;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "gemini")]
pub use crate::gemini::{DEFAULT_ENDPOINT, GeminiClient};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{MockGenerator, Reply};
pub use crate::request::GenerationRequest;

pub type GeneratorHandle = Arc<dyn Generator + Send + Sync>;

/// A generative text model behind some API.
///
/// # Examples
///
/// ```
/// use verbum_genai::{Generator, GenerationRequest, error::Result};
///
/// async fn one_liner(generator: &dyn Generator) -> Result<String> {
///     let request = GenerationRequest::new("gemini-3-flash-preview", "Oração para: gratidão")
///         .with_system_instruction("Escreva uma oração bíblica e curta.");
///     generator.generate(&request).await
/// }
/// ```
#[async_trait]
pub trait Generator: Send + Sync {
    /// Name of the service (used for logging only).
    fn name(&self) -> &str;

    /// Run one generation request and return the text of the answer.
    ///
    /// When the request carries a [response
    /// schema](GenerationRequest::with_response_schema), the text is expected
    /// to be JSON conforming to it, but nothing here checks that.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
