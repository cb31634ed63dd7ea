//! Web API module for Atelier
//!
//! Provides REST API endpoints for:
//! - Health checks
//! - Canvas sessions, commands, exports and saved paintings
//! - Social graph (users, tags, posts, likes, bookmarks, comments, follows, suggestions)

pub mod canvas;
pub mod health;
pub mod response;
pub mod social;

use axum::Router;

pub use canvas::{canvas_routes, CanvasApiState};
pub use health::health_routes;
pub use response::ApiResponse;
pub use social::{social_routes, SocialApiState};

/// Create the API router with all endpoints
pub fn api_router(canvas: CanvasApiState, social: SocialApiState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(canvas_routes(canvas))
        .merge(social_routes(social))
}
