use crate::error::CollaboratorError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("rag-core/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}

/// POST `body` as JSON and decode the JSON reply. Non-2xx and undecodable
/// bodies are reported separately from transport failures.
pub(crate) async fn post_json<B, T>(client: &Client, service: &'static str, url: &str, body: &B) -> Result<T, CollaboratorError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let resp = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|source| CollaboratorError::Transport { service, source })?;

    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|source| CollaboratorError::Transport { service, source })?;
    if !status.is_success() {
        return Err(CollaboratorError::Status { service, status: status.as_u16(), body: text });
    }
    serde_json::from_str(&text).map_err(|e| CollaboratorError::Malformed { service, reason: e.to_string() })
}
