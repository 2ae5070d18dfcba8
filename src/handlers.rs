// handlers.rs
use axum::{
    extract::{FromRequest, Path, State},
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    guard::AuthUser,
    models::{CreatePollRequest, Credentials, MessageResponse, Poll, TokenResponse, VoteRequest},
    state::AppState,
};

/// JSON body extractor whose rejections come back as `{"msg": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Register a new user
#[instrument(skip_all, fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<Credentials>,
) -> Result<Json<MessageResponse>, AppError> {
    let digest = state.auth.hash_password(&body.password).await?;
    let user = state.users.save(&body.username, &digest).await?;
    info!(user = %user.id, "User registered");

    Ok(Json(MessageResponse {
        msg: "User registered".to_string(),
    }))
}

/// Exchange a username and password for a token
#[instrument(skip_all, fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let Some(user) = state.users.find_by_username(&body.username).await? else {
        warn!("Login for unknown user");
        return Err(AppError::InvalidCredentials);
    };

    if !state
        .auth
        .verify_password(&body.password, &user.password)
        .await?
    {
        warn!("Login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.auth.issue_token(&user.id.to_string())?;
    Ok(Json(TokenResponse { token }))
}

/// Create a poll owned by the caller
#[instrument(skip_all, fields(user = %user.id))]
pub async fn create_poll(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreatePollRequest>,
) -> Result<Json<Poll>, AppError> {
    let poll = state
        .polls
        .save(&body.question, &body.options, &user.id)
        .await?;
    info!(poll = %poll.id, options = poll.options.len(), "Poll created");

    Ok(Json(poll))
}

/// Fetch every poll
pub async fn list_polls(State(state): State<AppState>) -> Result<Json<Vec<Poll>>, AppError> {
    Ok(Json(state.polls.find_all().await?))
}

/// Cast one vote for `options[optionIndex]`
#[instrument(skip_all, fields(user = %user.id, poll = %id))]
pub async fn vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<VoteRequest>,
) -> Result<Json<Poll>, AppError> {
    // An id that cannot be a poll id names no poll.
    let poll_id = Uuid::parse_str(&id).map_err(|_| AppError::PollNotFound)?;

    let poll = state.polls.record_vote(poll_id, body.option_index).await?;
    info!(option = body.option_index, "Vote recorded");

    Ok(Json(poll))
}
