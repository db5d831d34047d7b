//! reqwest-backed collection API client.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{ClientConfig, CollectionApi, RemoteError, Result, SearchQuery};
use crate::model::{ArtworkDetail, DepartmentsResponse, SearchResponse};

const DEPARTMENTS_PATH: &str = "public/collection/v1/departments";
const SEARCH_PATH: &str = "public/collection/v1/search";
const OBJECTS_PATH: &str = "public/collection/v1/objects";

/// Query string for `GET /search`. `q` is always sent, even when empty.
#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    #[serde(rename = "departmentId", skip_serializing_if = "Option::is_none")]
    department_id: Option<i64>,
    #[serde(rename = "hasImages", skip_serializing_if = "Option::is_none")]
    has_images: Option<bool>,
    #[serde(rename = "geoLocation", skip_serializing_if = "Option::is_none")]
    geo_location: Option<&'a str>,
}

impl<'a> From<&'a SearchQuery> for SearchParams<'a> {
    fn from(query: &'a SearchQuery) -> Self {
        Self {
            q: query.query.as_deref().unwrap_or(""),
            department_id: query.department_id,
            has_images: query.has_images,
            geo_location: query.geo_location.as_deref(),
        }
    }
}

/// Client for the Metropolitan Museum collection API.
#[derive(Debug, Clone)]
pub struct MetClient {
    http: Client,
    config: ClientConfig,
}

impl MetClient {
    /// Build a client with its own connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, config })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path);
        let mut request = self.http.get(&url);
        if let Some(query) = query {
            request = request.query(query);
        }

        debug!(url = %url, "Collection API request");
        let response = request.send().await?;
        decode(response).await
    }
}

/// Check the status and decode the body, telling an empty payload apart
/// from a malformed one.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::HttpStatus {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    let body = response.bytes().await?;
    let trimmed = body.trim_ascii();
    if trimmed.is_empty() || trimmed == b"null" {
        return Err(RemoteError::EmptyBody);
    }

    Ok(serde_json::from_slice(trimmed)?)
}

impl CollectionApi for MetClient {
    async fn list_departments(&self) -> Result<DepartmentsResponse> {
        self.get_json::<_, ()>(DEPARTMENTS_PATH, None).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let params = SearchParams::from(query);
        self.get_json(SEARCH_PATH, Some(&params)).await
    }

    async fn get_detail(&self, object_id: i64) -> Result<ArtworkDetail> {
        let path = format!("{}/{}", OBJECTS_PATH, object_id);
        self.get_json::<_, ()>(&path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_encoding() {
        let query = SearchQuery::new("")
            .with_department(Some(11))
            .with_has_images(true)
            .with_geo_location("France");
        let encoded = serde_json::to_value(SearchParams::from(&query)).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "q": "",
                "departmentId": 11,
                "hasImages": true,
                "geoLocation": "France"
            })
        );
    }

    #[test]
    fn test_search_params_skip_missing() {
        let encoded = serde_json::to_value(SearchParams::from(&SearchQuery::default())).unwrap();
        assert_eq!(encoded, serde_json::json!({ "q": "" }));
    }
}
