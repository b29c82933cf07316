use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    response::Response,
};

use crate::error::ApiError;
use crate::models::{Player, PlayerId, PlayerPayload};
use crate::response::Success;
use crate::state::AppState;

pub const DELETED_MESSAGE: &str = "Player successfully deleted!";

// Extractor rejections are taken as values so they are rendered in the
// configured response shape instead of axum's plain-text bodies.
type IdPath = Result<Path<String>, PathRejection>;
type RawBody = Result<Bytes, BytesRejection>;

fn player_id(path: IdPath) -> Result<PlayerId, ApiError> {
    let Path(raw) = path?;
    Ok(PlayerId::parse(&raw)?)
}

/// Parse a create/update body. The content type is not checked.
fn parse_payload(body: RawBody) -> Result<PlayerPayload, ApiError> {
    let body = body?;
    let payload: PlayerPayload =
        serde_json::from_slice(&body).map_err(|err| ApiError::MalformedInput(err.to_string()))?;
    payload.validate()?;
    Ok(payload)
}

// POST /player - Create a player
pub async fn create_player(State(state): State<AppState>, body: RawBody) -> Response {
    state.response_shape.respond(create(&state, body).await)
}

async fn create(state: &AppState, body: RawBody) -> Result<Success<Player>, ApiError> {
    let player = parse_payload(body)?.into_player(PlayerId::new());

    state.deadline(state.store.insert_one(&player)).await?;
    tracing::info!(id = %player.id, name = %player.name, "Created player");

    Ok(Success::created(player))
}

// GET /player/{id} - Get player by ID
pub async fn get_player(State(state): State<AppState>, id: IdPath) -> Response {
    state.response_shape.respond(get_one(&state, id).await)
}

async fn get_one(state: &AppState, id: IdPath) -> Result<Success<Player>, ApiError> {
    let id = player_id(id)?;

    let player = state
        .deadline(state.store.find_one(id))
        .await?
        .ok_or_else(ApiError::player_not_found)?;

    Ok(Success::ok(player))
}

// PUT /player/{id} - Overwrite name, region and position
pub async fn update_player(State(state): State<AppState>, id: IdPath, body: RawBody) -> Response {
    state.response_shape.respond(update(&state, id, body).await)
}

async fn update(state: &AppState, id: IdPath, body: RawBody) -> Result<Success<Player>, ApiError> {
    let id = player_id(id)?;
    let replacement = parse_payload(body)?.into_player(id);

    let player = state
        .deadline(state.store.find_one_and_replace(&replacement))
        .await?
        .ok_or_else(ApiError::player_not_found)?;
    tracing::info!(id = %player.id, "Updated player");

    Ok(Success::ok(player))
}

// DELETE /player/{id} - Delete player by ID
pub async fn delete_player(State(state): State<AppState>, id: IdPath) -> Response {
    match delete(&state, id).await {
        Ok(()) => state.response_shape.confirmation(DELETED_MESSAGE),
        Err(err) => state.response_shape.failure(err),
    }
}

async fn delete(state: &AppState, id: IdPath) -> Result<(), ApiError> {
    let id = player_id(id)?;

    let deleted = state.deadline(state.store.delete_one(id)).await?;
    if deleted == 0 {
        return Err(ApiError::player_not_found());
    }
    tracing::info!(%id, "Deleted player");

    Ok(())
}

// GET /players - List all players
pub async fn get_all_players(State(state): State<AppState>) -> Response {
    state.response_shape.respond(get_all(&state).await)
}

async fn get_all(state: &AppState) -> Result<Success<Vec<Player>>, ApiError> {
    let players = state.deadline(state.store.find_all()).await?;
    tracing::debug!(count = players.len(), "Listed players");

    Ok(Success::ok(players).with_message("players"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_must_be_json() {
        let err = parse_payload(Ok(Bytes::from_static(b"{\"name\": "))).unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput(_)));

        let err = parse_payload(Ok(Bytes::from_static(b"[1, 2]"))).unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput(_)));
    }

    #[test]
    fn payload_must_have_every_field() {
        let err = parse_payload(Ok(Bytes::from_static(br#"{"name": "Pele", "region": ""}"#))).unwrap_err();
        match err {
            ApiError::ValidationFailed(err) => assert_eq!(err.missing, vec!["region", "position"]),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn valid_payload_parses() {
        let payload = parse_payload(Ok(Bytes::from_static(br#"{"name": "Pele", "region": "Brazil", "position": "FW"}"#))).unwrap();
        assert_eq!(payload.name, "Pele");
    }
}
