//! Remote access to the collection API.
//!
//! [`CollectionApi`] is the seam the repository talks through: three typed
//! operations, each a single HTTP round trip. [`MetClient`] is the reqwest
//! implementation; tests substitute in-memory fakes.

pub mod client;
pub mod config;

use std::future::Future;

use thiserror::Error;

use crate::model::{ArtworkDetail, DepartmentsResponse, SearchResponse};

pub use client::MetClient;
pub use config::ClientConfig;

/// Errors from one collection API round trip.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Connection, TLS or timeout failure.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Error: {code} - {message}")]
    HttpStatus { code: u16, message: String },

    /// 2xx response without a payload.
    #[error("Empty response body")]
    EmptyBody,

    /// Payload that does not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RemoteError {
    /// Reason text without the status-code prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::HttpStatus { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { code: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// Parameters of a collection search. Every filter is optional; the server
/// decides what matching means.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub department_id: Option<i64>,
    pub has_images: Option<bool>,
    pub geo_location: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_department(mut self, department_id: Option<i64>) -> Self {
        self.department_id = department_id;
        self
    }

    pub fn with_has_images(mut self, has_images: bool) -> Self {
        self.has_images = Some(has_images);
        self
    }

    pub fn with_geo_location(mut self, geo_location: impl Into<String>) -> Self {
        self.geo_location = Some(geo_location.into());
        self
    }
}

/// The three remote operations of the collection API.
pub trait CollectionApi: Send + Sync {
    /// `GET /departments`.
    fn list_departments(&self) -> impl Future<Output = Result<DepartmentsResponse>> + Send;

    /// `GET /search`.
    fn search(&self, query: &SearchQuery) -> impl Future<Output = Result<SearchResponse>> + Send;

    /// `GET /objects/{id}`.
    fn get_detail(&self, object_id: i64) -> impl Future<Output = Result<ArtworkDetail>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RemoteError::HttpStatus { code: 404, message: "Not Found".to_string() };
        assert_eq!(err.to_string(), "Error: 404 - Not Found");
        assert_eq!(err.reason(), "Not Found");
        assert!(err.is_not_found());
        assert!(!RemoteError::EmptyBody.is_not_found());
    }

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("")
            .with_department(Some(11))
            .with_has_images(true)
            .with_geo_location("France");
        assert_eq!(query.query.as_deref(), Some(""));
        assert_eq!(query.department_id, Some(11));
        assert_eq!(query.has_images, Some(true));
        assert_eq!(query.geo_location.as_deref(), Some("France"));
    }
}
