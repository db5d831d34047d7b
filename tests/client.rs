//! MetClient and Repository against a local stub of the collection API.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures_util::StreamExt;
use parking_lot::Mutex;
use serde_json::json;

use metropolitan::{
    ClientConfig, CollectionApi, FetchState, HydrationConfig, MetClient, RemoteError, Repository, SearchQuery,
};

/// Records what the client asked for.
#[derive(Default)]
struct Stub {
    searches: Mutex<Vec<HashMap<String, String>>>,
    details: Mutex<Vec<i64>>,
}

async fn departments() -> Json<serde_json::Value> {
    Json(json!({
        "departments": [
            { "departmentId": 1, "displayName": "American Decorative Arts" },
            { "departmentId": 11, "displayName": "European Paintings" }
        ]
    }))
}

async fn search(State(stub): State<Arc<Stub>>, Query(params): Query<HashMap<String, String>>) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    stub.searches.lock().push(params);

    match q.as_str() {
        "nothing" => Json(json!({ "total": 0, "objectIDs": null })).into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({ "total": 3, "objectIDs": [5, 9, 3] })).into_response(),
    }
}

async fn object(State(stub): State<Arc<Stub>>, Path(id): Path<i64>) -> Response {
    stub.details.lock().push(id);

    match id {
        5 => Json(json!({
            "objectID": 5,
            "title": "Water Lilies",
            "artistDisplayName": "Claude Monet",
            "artistAlphaSort": "Monet, Claude",
            "primaryImageSmall": "https://images.example/5-small.jpg",
            "isHighlight": true
        }))
        .into_response(),
        3 => Json(json!({
            "objectID": 3,
            "title": "The Card Players",
            "artistDisplayName": "Paul Cézanne",
            "artistAlphaSort": "Cézanne, Paul",
            "primaryImage": "https://images.example/3.jpg",
            "primaryImageSmall": "",
            "tags": [{ "term": "Men", "AAT_URL": null, "Wikidata_URL": null }]
        }))
        .into_response(),
        // 200 with nothing in it
        7 => StatusCode::OK.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the stub on an ephemeral port and return its base URL.
async fn serve(stub: Arc<Stub>) -> String {
    let app = Router::new()
        .route("/public/collection/v1/departments", get(departments))
        .route("/public/collection/v1/search", get(search))
        .route("/public/collection/v1/objects/:id", get(object))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

async fn client() -> (MetClient, Arc<Stub>) {
    let stub = Arc::new(Stub::default());
    let base_url = serve(Arc::clone(&stub)).await;
    let client = MetClient::new(ClientConfig::new(base_url)).unwrap();
    (client, stub)
}

#[tokio::test]
async fn test_list_departments() {
    let (client, _) = client().await;

    let response = client.list_departments().await.unwrap();
    assert_eq!(response.departments.len(), 2);
    assert_eq!(response.departments[1].id, 11);
    assert_eq!(response.departments[1].display_name, "European Paintings");
}

#[tokio::test]
async fn test_search_query_string() {
    let (client, stub) = client().await;

    let query = SearchQuery::new("sunflowers")
        .with_department(Some(11))
        .with_has_images(true);
    let response = client.search(&query).await.unwrap();
    assert_eq!(response.ids(), &[5, 9, 3]);

    let query = SearchQuery::new("").with_geo_location("France");
    client.search(&query).await.unwrap();

    let searches = stub.searches.lock();
    assert_eq!(searches[0]["q"], "sunflowers");
    assert_eq!(searches[0]["departmentId"], "11");
    assert_eq!(searches[0]["hasImages"], "true");
    assert!(!searches[0].contains_key("geoLocation"));

    // Empty q is still sent
    assert_eq!(searches[1]["q"], "");
    assert_eq!(searches[1]["geoLocation"], "France");
    assert!(!searches[1].contains_key("departmentId"));
    assert!(!searches[1].contains_key("hasImages"));
}

#[tokio::test]
async fn test_search_null_ids() {
    let (client, _) = client().await;

    let response = client.search(&SearchQuery::new("nothing")).await.unwrap();
    assert_eq!(response.total, 0);
    assert!(response.ids().is_empty());
}

#[tokio::test]
async fn test_get_detail() {
    let (client, _) = client().await;

    let artwork = client.get_detail(3).await.unwrap();
    assert_eq!(artwork.object_id, 3);
    assert_eq!(artwork.artist_alpha_sort.as_deref(), Some("Cézanne, Paul"));
    // Blank small image falls back to the primary one
    assert_eq!(artwork.image_url(), Some("https://images.example/3.jpg"));
    assert_eq!(artwork.tags.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_get_detail_not_found() {
    let (client, _) = client().await;

    let err = client.get_detail(9).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Error: 404 - Not Found");
}

#[tokio::test]
async fn test_get_detail_empty_body() {
    let (client, _) = client().await;

    let err = client.get_detail(7).await.unwrap_err();
    assert!(matches!(err, RemoteError::EmptyBody));
}

#[tokio::test]
async fn test_transport_error() {
    // Bind and release a port so nothing is listening on it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = MetClient::new(ClientConfig::new(format!("http://{}/", addr))).unwrap();
    let err = client.list_departments().await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)));
    assert!(err.to_string().starts_with("Network error: "));
}

#[tokio::test]
async fn test_repository_hydrates_over_http() {
    let (client, stub) = client().await;
    let repository = Repository::new(client, HydrationConfig::default());

    let states: Vec<_> = repository
        .search_and_hydrate(SearchQuery::new("paintings"), 50)
        .collect()
        .await;

    assert_eq!(states.len(), 2);
    assert_eq!(states[0], FetchState::Loading);
    let artworks = states[1].success().unwrap();

    // 9 is a 404 and dropped; the rest are sorted by artist
    let ids: Vec<i64> = artworks.iter().map(|a| a.object_id).collect();
    assert_eq!(ids, vec![3, 5]);
    assert_eq!(*stub.details.lock(), vec![5, 9, 3]);
}

#[tokio::test]
async fn test_repository_search_failure() {
    let (client, stub) = client().await;
    let repository = Repository::new(client, HydrationConfig::default());

    let states: Vec<_> = repository
        .search_and_hydrate(SearchQuery::new("broken"), 50)
        .collect()
        .await;

    assert_eq!(
        states.last(),
        Some(&FetchState::Error("Search failed: Internal Server Error".to_string()))
    );
    assert!(stub.details.lock().is_empty());
}

#[tokio::test]
async fn test_repository_artwork_not_found() {
    let (client, _) = client().await;
    let repository = Repository::new(client, HydrationConfig::default());

    let states: Vec<_> = repository.artwork_detail(7).collect().await;
    assert_eq!(
        states,
        vec![FetchState::Loading, FetchState::Error("Artwork not found".to_string())]
    );

    let states: Vec<_> = repository.artwork_detail(9).collect().await;
    assert_eq!(states.last(), Some(&FetchState::Error("Error: 404 - Not Found".to_string())));
}
