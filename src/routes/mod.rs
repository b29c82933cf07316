use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod players;

/// Route table for the player API.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))

        // Player endpoints
        .route("/player", post(players::create_player))
        .route(
            "/player/{id}",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route("/players", get(players::get_all_players))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
