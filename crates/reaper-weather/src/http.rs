//! Shared GET helpers. Shape errors surface as `WeatherError::Parse` so the
//! orchestrator logs "malformed response" rather than a transport failure.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::types::WeatherError;

pub(crate) async fn get_text(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, WeatherError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.text().await?)
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, WeatherError> {
    let body = get_text(client, url, query).await?;
    serde_json::from_str(&body).map_err(|e| WeatherError::Parse(format!("{url}: {e}")))
}
