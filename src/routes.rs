// routes.rs
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/polls", get(handlers::list_polls).post(handlers::create_poll))
        .route("/polls/{id}/vote", post(handlers::vote))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
