use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Player, PlayerId};
use crate::query::{PlayerFilter, PlayerPatch};
use crate::storage::{DeleteOutcome, InsertOutcome};

/// Decode a JSON request body. A blank body decodes to the default value.
fn decode_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {}", e)))
}

pub async fn create_player(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<InsertOutcome>), ApiError> {
    let patch: PlayerPatch = decode_body(&body)?;

    // Blank fields in the body count as absent, so they keep their defaults
    let mut player = Player::with_defaults();
    patch.apply(&mut player);
    info!(
        "Request received to create player {} {}",
        player.firstname, player.lastname
    );

    if state.settings.validation.require_fields {
        let missing = player.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            return Err(ApiError::BadRequest(format!(
                "Missing required fields: {}",
                names.join(", ")
            )));
        }
    }

    let outcome = state.store.insert(player).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Player>>, ApiError> {
    info!("Request received to list players");

    let filter = PlayerFilter::from_query_pairs(&params);
    debug!("Player filter: {:?}", filter.clauses());

    let players = state.store.find(&filter).await?;
    Ok(Json(players))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    info!("Request received to get player {}", id);
    let id = PlayerId::parse(&id)?;

    let player = state.store.find_by_id(&id).await?;
    Ok(Json(player))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Player>, ApiError> {
    info!("Request received to update player {}", id);
    let id = PlayerId::parse(&id)?;

    let patch: PlayerPatch = decode_body(&body)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "Update contains no fields to set".to_string(),
        ));
    }

    let mut player = state.store.update(&id, &patch).await?;
    player.id = Some(id);
    Ok(Json(player))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    info!("Request received to delete player {}", id);
    let id = PlayerId::parse(&id)?;

    let outcome = state.store.delete(&id).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::config::Settings;
    use crate::storage::{MemoryPlayerStore, PlayerStore, StoreError};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn setup_test_state(settings: Settings) -> (AppState, Arc<MemoryPlayerStore>) {
        let store = Arc::new(MemoryPlayerStore::new());
        let state = AppState::new(store.clone(), settings);
        (state, store)
    }

    fn test_app() -> (axum::Router, Arc<MemoryPlayerStore>) {
        let (state, store) = setup_test_state(Settings::default());
        (build_router(state), store)
    }

    async fn send(app: axum::Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri, "").await
    }

    async fn create(app: &axum::Router, body: &str) -> String {
        let (status, json) = send(app.clone(), "POST", "/player", body).await;
        assert_eq!(status, StatusCode::CREATED);
        json["inserted_id"].as_str().unwrap().to_string()
    }

    // ── Create ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_merges_onto_defaults() {
        let (app, store) = test_app();
        let id = create(&app, r#"{"firstname":"Ann","lastname":"Lee"}"#).await;

        let stored = store
            .find_by_id(&PlayerId::parse(&id).unwrap())
            .await
            .unwrap();
        assert_eq!(stored.firstname, "Ann");
        assert_eq!(stored.lastname, "Lee");
        assert_eq!(stored.company, "Red Hat");
        assert_eq!(stored.status, "Internal");
    }

    #[tokio::test]
    async fn test_create_empty_body_stores_defaults() {
        let (app, store) = test_app();
        let id = create(&app, "").await;

        let stored = store
            .find_by_id(&PlayerId::parse(&id).unwrap())
            .await
            .unwrap();
        assert_eq!(
            stored,
            Player {
                id: Some(PlayerId::parse(&id).unwrap()),
                ..Player::with_defaults()
            }
        );
    }

    #[tokio::test]
    async fn test_create_client_overrides_defaults() {
        let (app, _) = test_app();
        let id = create(&app, r#"{"company":"Acme","status":"External"}"#).await;

        let (status, json) = get_json(app, &format!("/player/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"_id": id, "company": "Acme", "status": "External"}));
    }

    #[tokio::test]
    async fn test_create_blank_fields_keep_defaults() {
        let (app, store) = test_app();
        let id = create(&app, r#"{"firstname":"Ann","company":"","status":""}"#).await;

        let stored = store
            .find_by_id(&PlayerId::parse(&id).unwrap())
            .await
            .unwrap();
        assert_eq!(stored.company, "Red Hat");
        assert_eq!(stored.status, "Internal");
        assert_eq!(stored.firstname, "Ann");
    }

    #[tokio::test]
    async fn test_create_malformed_body_rejected() {
        let (app, store) = test_app();
        let (status, json) = send(app, "POST", "/player", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_required_fields_enforced_when_enabled() {
        let mut settings = Settings::default();
        settings.validation.require_fields = true;
        let (state, store) = setup_test_state(settings);
        let app = build_router(state);

        let (status, json) = send(app.clone(), "POST", "/player", r#"{"firstname":"Ann"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("lastname"));
        assert!(store.is_empty().await);

        let (status, _) = send(
            app,
            "POST",
            "/player",
            r#"{"firstname":"Ann","lastname":"Lee"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // ── List / search ────────────────────────────────────────────

    #[tokio::test]
    async fn test_list_empty_is_empty_array() {
        let (app, _) = test_app();
        let (status, json) = get_json(app, "/players").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn test_list_filters_by_all_given_fields() {
        let (app, _) = test_app();
        create(&app, r#"{"firstname":"Ann","company":"RedHat"}"#).await;
        create(&app, r#"{"firstname":"Bob","company":"RedHat","status":"External"}"#).await;
        create(&app, r#"{"firstname":"Cid"}"#).await;

        let (status, json) = get_json(app.clone(), "/players?company=RedHat&status=Internal").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["firstname"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ann"]);

        let (_, json) = get_json(app.clone(), "/players").await;
        assert_eq!(json.as_array().unwrap().len(), 3);

        // Empty values and unknown parameters do not narrow the search
        let (_, json) = get_json(app.clone(), "/players?firstname=&page=2").await;
        assert_eq!(json.as_array().unwrap().len(), 3);

        let (_, json) = get_json(app, "/players?email=nobody%40example.com").await;
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn test_list_repeated_param_uses_first_value() {
        let (app, _) = test_app();
        create(&app, r#"{"firstname":"Ann"}"#).await;

        // Company defaults to "Red Hat"; the first value "X" matches nobody
        let (status, json) = get_json(app.clone(), "/players?company=X&company=Red%20Hat").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));

        let (_, json) = get_json(app, "/players?company=Red%20Hat&company=X").await;
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    // ── Get by id ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (app, _) = test_app();
        let uri = format!("/player/{}", PlayerId::generate());
        let (status, json) = get_json(app, &uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_invalid_id_is_bad_request() {
        let (app, _) = test_app();
        let (status, json) = get_json(app, "/player/not-an-id").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    // ── Update ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_update_sets_fields_and_echoes_path_id() {
        let (app, _) = test_app();
        let id = create(&app, r#"{"firstname":"Ann","lastname":"Lee"}"#).await;

        let (status, json) = send(
            app.clone(),
            "PUT",
            &format!("/player/{}", id),
            r#"{"_id":"5f1b2c3d4e5f60718293a4b5","email":"ann@example.com","lastname":""}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "_id": id,
                "firstname": "Ann",
                "lastname": "Lee",
                "company": "Red Hat",
                "status": "Internal",
                "email": "ann@example.com",
            })
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (app, _) = test_app();
        let uri = format!("/player/{}", PlayerId::generate());
        let (status, _) = send(app, "PUT", &uri, r#"{"status":"External"}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_input() {
        let (app, _) = test_app();
        let id = create(&app, r#"{"firstname":"Ann"}"#).await;
        let uri = format!("/player/{}", id);

        let (status, _) = send(app.clone(), "PUT", &uri, "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app.clone(), "PUT", &uri, "[1, 2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app, "PUT", "/player/xyz", r#"{"status":"External"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// A store whose update result never carries an id.
    struct IdlessStore;

    #[async_trait]
    impl PlayerStore for IdlessStore {
        fn name(&self) -> &'static str {
            "idless"
        }

        async fn insert(&self, _player: Player) -> Result<InsertOutcome, StoreError> {
            Err(StoreError::Unexpected("read-only".to_string()))
        }

        async fn find(&self, _filter: &PlayerFilter) -> Result<Vec<Player>, StoreError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, id: &PlayerId) -> Result<Player, StoreError> {
            Err(StoreError::NotFound(*id))
        }

        async fn update(&self, _id: &PlayerId, patch: &PlayerPatch) -> Result<Player, StoreError> {
            let mut player = Player::default();
            patch.apply(&mut player);
            Ok(player)
        }

        async fn delete(&self, _id: &PlayerId) -> Result<DeleteOutcome, StoreError> {
            Ok(DeleteOutcome { deleted_count: 0 })
        }
    }

    #[tokio::test]
    async fn test_update_response_id_is_path_id_regardless_of_store() {
        let app = build_router(AppState::new(Arc::new(IdlessStore), Settings::default()));
        let id = PlayerId::generate();

        let (status, json) = send(
            app,
            "PUT",
            &format!("/player/{}", id),
            r#"{"status":"External"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["_id"], id.to_hex());
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let app = build_router(AppState::new(Arc::new(IdlessStore), Settings::default()));
        let (status, json) = send(app, "POST", "/player", r#"{"firstname":"Ann"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    // ── Delete ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_delete_not_routed_by_default() {
        let (app, store) = test_app();
        let id = create(&app, r#"{"firstname":"Ann"}"#).await;

        let (status, _) = send(app, "DELETE", &format!("/player/{}", id), "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_when_enabled() {
        let mut settings = Settings::default();
        settings.server.enable_delete = true;
        let (state, store) = setup_test_state(settings);
        let app = build_router(state);
        let id = create(&app, r#"{"firstname":"Ann"}"#).await;
        let uri = format!("/player/{}", id);

        let (status, json) = send(app.clone(), "DELETE", &uri, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"deleted_count": 1}));
        assert!(store.is_empty().await);

        let (status, _) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_decode_body_blank_is_default() {
        let patch: PlayerPatch = decode_body(b"  \n").unwrap();
        assert!(patch.is_empty());
    }
}
