use async_trait::async_trait;
use std::fmt::Debug;

/// Receives every prompt/response pair sent through a generator.
#[async_trait]
pub trait Interceptor: Send + Sync + Debug {
    async fn save(&self, exchange: &Exchange<'_>) -> std::io::Result<()>;
}

/// One round trip to the completion service.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub purpose: &'a str,
    pub model: &'a str,
    pub prompt: &'a str,
    pub response: &'a str,
}

pub mod file;
pub use file::FileInterceptor;
