//! Command runner interface
//!
//! The console does not know how commands execute; it hands the input line
//! to a [`CommandRunner`] and records whatever comes back.

use async_trait::async_trait;
use std::future::Future;

/// Executes one command line.
///
/// - `Ok(Some(text))` appends `text` as the response
/// - `Ok(None)` appends nothing
/// - `Err(e)` appends an error response built from `e`
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, input: &str) -> anyhow::Result<Option<String>>;
}

#[async_trait]
impl<F, Fut> CommandRunner for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    async fn run(&self, input: &str) -> anyhow::Result<Option<String>> {
        (self)(input.to_string()).await
    }
}
