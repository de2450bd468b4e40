use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam between the decoder pipeline and the network. Tests substitute a
/// stub; production uses [`super::BasicClient`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
