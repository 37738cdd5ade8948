//! Router-level tests over the in-memory store.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pokedex_api::{
    app,
    model::{Pokemon, PokemonDraft, PokemonType},
    query::{Found, ListQuery},
    store::Merge,
    AppConfig, AppError, AppState, MemoryStore, PokemonStore,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router_with(config: AppConfig) -> Router {
    let state = AppState::new(Arc::new(MemoryStore::with_default_types()));
    app(state, &config)
}

fn router() -> Router {
    let mut config = AppConfig::default();
    config.rate_limit.max_requests = 10_000;
    router_with(config)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

fn pokemon_body(name: &str, types: &[&str], generation: i32) -> Value {
    json!({
        "name": name,
        "species": format!("{} Pokemon", name),
        "types": types,
        "generation": generation,
        "height": 0.4,
        "weight": 6.0,
        "abilities": ["Static"],
        "stats": {
            "hp": 35, "attack": 55, "defense": 40,
            "specialAttack": 50, "specialDefense": 50, "speed": 90
        },
        "description": format!("{} is a test entry.", name)
    })
}

async fn create(router: &Router, body: Value) -> Value {
    let (status, value) = send(router, Method::POST, "/api/v1/pokemon", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", value);
    value["data"].clone()
}

#[tokio::test]
async fn create_computes_total_and_applies_defaults() {
    let router = router();
    let mut body = pokemon_body("Pikachu", &["Electric"], 1);
    body["stats"]["total"] = json!(9999);
    let (status, value) = send(&router, Method::POST, "/api/v1/pokemon", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["message"], json!("Pokemon created successfully"));
    let data = &value["data"];
    assert_eq!(data["stats"]["total"], json!(320));
    assert_eq!(data["habitat"], json!("unknown"));
    assert_eq!(data["captureRate"], json!(45));
    assert_eq!(data["genderRatio"], json!({"male": 50.0, "female": 50.0}));
    assert!(data["createdAt"].is_string());

    let id = data["id"].as_i64().unwrap();
    let (status, value) = get(&router, &format!("/api/v1/pokemon/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"]["name"], json!("Pikachu"));
}

#[tokio::test]
async fn create_rejects_missing_fields_and_bad_stats() {
    let router = router();
    let (status, value) = send(
        &router,
        Method::POST,
        "/api/v1/pokemon",
        Some(json!({"name": "Nameless"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["error"], json!("Validation Error"));

    let mut body = pokemon_body("Overflow", &["Normal"], 1);
    body["stats"]["hp"] = json!(300);
    let (status, value) = send(&router, Method::POST, "/api/v1/pokemon", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("Validation Error"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let router = router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/pokemon")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["error"], json!("Bad Request"));
}

#[tokio::test]
async fn duplicate_name_is_validation_error() {
    let router = router();
    create(&router, pokemon_body("Eevee", &["Normal"], 1)).await;
    let (status, value) = send(
        &router,
        Method::POST,
        "/api/v1/pokemon",
        Some(pokemon_body("Eevee", &["Normal"], 1)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("Validation Error"));
}

#[tokio::test]
async fn missing_id_is_not_found() {
    let router = router();
    let (status, value) = get(&router, "/api/v1/pokemon/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        value,
        json!({
            "success": false,
            "error": "Not Found",
            "message": "Pokemon with id 999 not found"
        })
    );

    let (status, _) = get(&router, "/api/v1/pokemon/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pagination_over_45_items() {
    let router = router();
    for i in 0..45 {
        create(&router, pokemon_body(&format!("Mon{:02}", i), &["Normal"], 1)).await;
    }

    let (_, page1) = get(&router, "/api/v1/pokemon?page=1&limit=20").await;
    assert_eq!(page1["data"].as_array().unwrap().len(), 20);
    assert_eq!(page1["pagination"]["totalPages"], json!(3));
    assert_eq!(page1["pagination"]["totalItems"], json!(45));
    assert_eq!(page1["pagination"]["hasNextPage"], json!(true));
    assert_eq!(page1["pagination"]["hasPreviousPage"], json!(false));

    let (_, page3) = get(&router, "/api/v1/pokemon?page=3&limit=20").await;
    assert_eq!(page3["data"].as_array().unwrap().len(), 5);
    assert_eq!(page3["pagination"]["currentPage"], json!(3));
    assert_eq!(page3["pagination"]["hasNextPage"], json!(false));
    assert_eq!(page3["pagination"]["hasPreviousPage"], json!(true));

    let (_, capped) = get(&router, "/api/v1/pokemon?limit=500").await;
    assert_eq!(capped["pagination"]["itemsPerPage"], json!(100));
    assert_eq!(capped["data"].as_array().unwrap().len(), 45);

    let (_, clamped) = get(&router, "/api/v1/pokemon?page=0&limit=0").await;
    assert_eq!(clamped["pagination"]["currentPage"], json!(1));
    assert_eq!(clamped["pagination"]["itemsPerPage"], json!(20));
}

#[tokio::test]
async fn filters_intersect() {
    let router = router();
    create(&router, pokemon_body("Pikachu", &["Electric"], 1)).await;
    create(&router, pokemon_body("Raichu", &["Electric"], 1)).await;
    create(&router, pokemon_body("Pichu", &["Electric"], 2)).await;
    create(&router, pokemon_body("Chikorita", &["Grass"], 2)).await;

    let (_, electric) = get(&router, "/api/v1/pokemon?type=Electric").await;
    assert_eq!(electric["pagination"]["totalItems"], json!(3));

    let (_, gen2) = get(&router, "/api/v1/pokemon?generation=2").await;
    assert_eq!(gen2["pagination"]["totalItems"], json!(2));

    let (_, both) = get(&router, "/api/v1/pokemon?type=Electric&generation=2").await;
    let names: Vec<&str> = both["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pichu"]);
    assert_eq!(both["meta"]["filters"], json!({"type": "Electric", "generation": 2}));
}

#[tokio::test]
async fn invalid_query_values_are_bad_request() {
    let router = router();
    for uri in [
        "/api/v1/pokemon?generation=one",
        "/api/v1/pokemon?page=x",
        "/api/v1/pokemon?sort=color",
        "/api/v1/pokemon?order=sideways",
        "/api/v1/search?minStats=lots",
    ] {
        let (status, value) = get(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(value["error"], json!("Bad Request"), "{}", uri);
    }
}

#[tokio::test]
async fn sort_by_name_descending() {
    let router = router();
    for name in ["Bulbasaur", "Charmander", "Squirtle"] {
        create(&router, pokemon_body(name, &["Normal"], 1)).await;
    }
    let (status, value) = get(&router, "/api/v1/pokemon?sort=name&order=desc").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = value["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Squirtle", "Charmander", "Bulbasaur"]);
    assert_eq!(value["meta"]["sort"], json!("name"));
    assert_eq!(value["meta"]["order"], json!("DESC"));
}

#[tokio::test]
async fn search_matches_name_species_or_description() {
    let router = router();
    create(&router, pokemon_body("Pikachu", &["Electric"], 1)).await;
    create(&router, pokemon_body("Bulbasaur", &["Grass"], 1)).await;

    let (status, value) = get(&router, "/api/v1/search?q=pika").await;
    assert_eq!(status, StatusCode::OK);
    let data = value["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], json!("Pikachu"));
    assert_eq!(value["meta"]["query"], json!("pika"));
    assert_eq!(value["meta"]["count"], json!(1));

    let (_, none) = get(&router, "/api/v1/search?q=pika&type=Grass").await;
    assert!(none["data"].as_array().unwrap().is_empty());

    let (_, all) = get(&router, "/api/v1/search").await;
    assert_eq!(all["meta"]["totalItems"], json!(2));
}

#[tokio::test]
async fn search_returns_every_match_unless_paged() {
    let router = router();
    for i in 0..25 {
        create(&router, pokemon_body(&format!("Pika{:02}", i), &["Electric"], 1)).await;
    }

    let (status, value) = get(&router, "/api/v1/search?q=pika").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"].as_array().unwrap().len(), 25);
    assert_eq!(value["meta"]["totalItems"], json!(25));
    assert!(value.get("pagination").is_none());

    let (_, paged) = get(&router, "/api/v1/search?q=pika&page=2&limit=10").await;
    assert_eq!(paged["data"].as_array().unwrap().len(), 10);
    assert_eq!(paged["data"][0]["name"], json!("Pika10"));
    assert_eq!(paged["pagination"]["totalPages"], json!(3));
}

#[tokio::test]
async fn create_after_max_id_fails_without_breaking_the_store() {
    let router = router();
    let mut body = pokemon_body("Arceus", &["Normal"], 4);
    body["id"] = json!(i32::MAX);
    create(&router, body).await;

    let (status, value) = send(
        &router,
        Method::POST,
        "/api/v1/pokemon",
        Some(pokemon_body("Mew", &["Psychic"], 1)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("Validation Error"));

    let (status, value) = get(&router, "/api/v1/pokemon").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["pagination"]["totalItems"], json!(1));
}

#[tokio::test]
async fn oversized_body_gets_error_envelope() {
    let router = router();
    let mut body = pokemon_body("Wailord", &["Water"], 3);
    body["description"] = json!("w".repeat(2 * 1024 * 1024));
    let (status, value) = send(&router, Method::POST, "/api/v1/pokemon", Some(body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["error"], json!("Payload Too Large"));
}

#[tokio::test]
async fn update_merges_and_recomputes_total() {
    let router = router();
    let created = create(&router, pokemon_body("Pikachu", &["Electric"], 1)).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/pokemon/{}", id);

    let (status, value) = send(
        &router,
        Method::PUT,
        &uri,
        Some(json!({
            "habitat": "forest",
            "stats": {"hp": 60, "attack": 90, "defense": 55,
                      "specialAttack": 90, "specialDefense": 80, "speed": 110}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["message"], json!("Pokemon updated successfully"));
    assert_eq!(value["data"]["habitat"], json!("forest"));
    assert_eq!(value["data"]["stats"]["total"], json!(485));
    assert_eq!(value["data"]["name"], json!("Pikachu"));

    let (status, _) = send(&router, Method::PUT, "/api/v1/pokemon/999", Some(json!({"habitat": "cave"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, value) = send(&router, Method::PUT, &uri, Some(json!({"types": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("Validation Error"));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let router = router();
    let created = create(&router, pokemon_body("Ditto", &["Normal"], 1)).await;
    let uri = format!("/api/v1/pokemon/{}", created["id"]);

    let (status, value) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"]["name"], json!("Ditto"));

    let (status, _) = get(&router, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn types_are_listed_by_name() {
    let router = router();
    let (status, value) = get(&router, "/api/v1/types").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = value["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 18);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(value["meta"]["count"], json!(18));
}

#[tokio::test]
async fn unknown_route_and_wrong_verb_are_not_found() {
    let router = router();
    let (status, value) = get(&router, "/api/v1/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["message"], json!("Route GET /api/v1/nothing not found"));

    let (status, value) = send(&router, Method::PATCH, "/api/v1/pokemon/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["error"], json!("Not Found"));
}

#[tokio::test]
async fn root_describes_the_api() {
    let router = router();
    let (status, value) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["name"], json!("pokedex-api"));
    assert!(value["version"].is_string());
    assert!(value["endpoints"].is_object());
}

#[tokio::test]
async fn health_reports_healthy_store() {
    let router = router();
    let (status, value) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], json!("healthy"));
    assert!(value["uptime"].is_number());
}

struct UnreachableStore;

#[async_trait]
impl PokemonStore for UnreachableStore {
    async fn find(&self, _query: &ListQuery) -> Result<Found<Pokemon>, AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
    async fn get(&self, _id: i32) -> Result<Option<Pokemon>, AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
    async fn create(&self, _draft: PokemonDraft) -> Result<Pokemon, AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
    async fn update(&self, _id: i32, _merge: Merge<'_>) -> Result<Option<Pokemon>, AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
    async fn delete(&self, _id: i32) -> Result<Option<Pokemon>, AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
    async fn list_types(&self) -> Result<Vec<PokemonType>, AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
}

#[tokio::test]
async fn health_and_api_when_store_is_down() {
    let router = app(AppState::new(Arc::new(UnreachableStore)), &AppConfig::default());

    let (status, value) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(value["status"], json!("unhealthy"));
    assert_eq!(value["error"], json!("connection refused"));

    let (status, value) = get(&router, "/api/v1/pokemon").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["error"], json!("Internal Server Error"));
}

#[tokio::test]
async fn rate_limit_rejects_after_max_requests() {
    let mut config = AppConfig::default();
    config.rate_limit.max_requests = 2;
    let router = router_with(config);

    for remaining in ["1", "0"] {
        let response = router
            .clone()
            .oneshot(Request::get("/api/v1/types").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let response = router
        .clone()
        .oneshot(Request::get("/api/v1/types").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["error"], json!("Too Many Requests"));

    // Service routes are not limited.
    let (status, _) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn security_headers_are_set() {
    let router = router();
    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(response.headers()["referrer-policy"], "no-referrer");
}
