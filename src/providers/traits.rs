use async_trait::async_trait;

use crate::error::ServiceError;

/// A chat-style text generation service: one system message, one user
/// message, free text back.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ServiceError>;

    /// Short service name used in errors and logs.
    fn name(&self) -> &'static str;

    fn get_model_info(&self) -> String;
}
