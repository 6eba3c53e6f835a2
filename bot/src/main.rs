//! rallybot
//!
//! A chat-platform bot running sign-up tournaments: participants register,
//! declare who they want to play with, and the bot keeps a paginated set
//! of view messages synchronized with the resulting premade grouping.
//! Uses hexagonal (ports & adapters) architecture for clean separation of
//! concerns.

use std::sync::Arc;

use axum::{
    routing::{delete, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod view;

#[cfg(test)]
mod test_utils;


use adapters::{ChatClientImpl, PostgresParticipantRepository, PostgresTournamentRepository};
use app::{RenderQueue, TournamentService, ViewSyncService};
use config::Config;
use domain::ports::TournamentRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub tournament_service: Arc<
        TournamentService<
            PostgresTournamentRepository,
            PostgresParticipantRepository,
            ChatClientImpl,
        >,
    >,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rallybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting rallybot...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    // Create adapters
    let tournament_repo = Arc::new(PostgresTournamentRepository::new(db.clone()));
    let participant_repo = Arc::new(PostgresParticipantRepository::new(db.clone()));
    let chat_client = Arc::new(ChatClientImpl::new(
        config.chat_api_url.clone(),
        config.chat_link_base.clone(),
        config.chat_bot_token.clone(),
    ));

    // Create application services
    let sync_service = Arc::new(ViewSyncService::new(
        tournament_repo.clone(),
        participant_repo.clone(),
        chat_client.clone(),
    ));
    let render_queue = RenderQueue::new(sync_service.clone());
    let tournament_service = Arc::new(TournamentService::new(
        tournament_repo.clone(),
        participant_repo.clone(),
        sync_service.clone(),
        render_queue.clone(),
    ));

    // Resume view synchronization for every stored tournament
    match tournament_repo.find_all().await {
        Ok(tournaments) => {
            tracing::info!("Resuming {} tournament view(s)", tournaments.len());
            for tournament in tournaments {
                render_queue.enqueue(tournament.id).await;
            }
        }
        Err(e) => tracing::error!("Could not list tournaments for resume: {}", e),
    }

    let state = AppState { tournament_service };

    let app = Router::new()
        .route("/health", axum::routing::get(health))
        .route("/tournaments", post(handlers::create_tournament))
        .route("/tournaments/:id", delete(handlers::delete_tournament))
        .route(
            "/tournaments/:id/participants",
            post(handlers::join_tournament),
        )
        .route(
            "/tournaments/:id/participants/:participant_id",
            delete(handlers::leave_tournament),
        )
        .route(
            "/tournaments/:id/premades/:participant_id",
            put(handlers::set_premades).delete(handlers::reset_premades),
        )
        .route(
            "/tournaments/:id/premades/:participant_id/opt-out",
            post(handlers::opt_out),
        )
        .route(
            "/tournaments/:id/refresh",
            post(handlers::refresh_tournament),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server failed");
}
