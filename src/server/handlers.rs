use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth;
use crate::data::upgrades::UpgradeKind;
use crate::rules::pricing::cost_at_level;
use crate::server::error::ApiError;
use crate::server::session;
use crate::server::AppContext;
use crate::store::repository::{GameLedger, LeaderboardEntry, LedgerError, UserId};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Validation outcome rendered to the form, HTTP 200.
#[derive(Debug, Serialize)]
struct FormMessage {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct BlocksResponse {
    blocks: i64,
}

#[derive(Debug, Serialize)]
struct UpgradeStatus {
    upgrade_type: UpgradeKind,
    level: i64,
    next_cost: i64,
}

#[derive(Debug, Serialize)]
struct HomeResponse {
    username: String,
    blocks: i64,
    bpc: i64,
    bps: i64,
    upgrades: Vec<UpgradeStatus>,
}

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
    users: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct UpgradeResponse {
    blocks: i64,
    bpc: i64,
    bps: i64,
    level: i64,
    next_cost: i64,
    upgrade_type: UpgradeKind,
}

fn form_message(message: &'static str) -> Response {
    Json(FormMessage { message }).into_response()
}

fn authed_user(ctx: &AppContext, headers: &HeaderMap) -> Option<UserId> {
    let token = session::session_token(headers)?;
    ctx.sessions.resolve(&token)
}

pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    if let Err(issue) =
        auth::validate_registration(&form.username, &form.password, &form.confirmation)
    {
        return Ok(form_message(issue.message()));
    }

    let hash = auth::hash_password(&form.password).map_err(|err| {
        tracing::error!("password hashing failed: {}", err);
        ApiError::internal()
    })?;

    match ctx.ledger.lock().register_user(&form.username, &hash) {
        Ok(user) => {
            tracing::info!(username = %form.username, id = user.0, "registered user");
            Ok(Redirect::to("/login").into_response())
        }
        Err(LedgerError::UsernameTaken) => Ok(form_message("Username already taken.")),
        Err(err) => Err(err.into()),
    }
}

pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Ok(form_message("Please fill out all fields."));
    }

    let credentials = ctx.ledger.lock().credentials_for(&form.username)?;
    let Some((user, stored_hash)) = credentials else {
        return Ok(form_message("Invalid username and/or password."));
    };
    if !auth::verify_password(&stored_hash, &form.password) {
        return Ok(form_message("Invalid username and/or password."));
    }

    let token = ctx.sessions.create(user);
    tracing::info!(username = %form.username, id = user.0, "logged in");
    Ok((
        [(SET_COOKIE, session::session_cookie(&token))],
        Redirect::to("/"),
    )
        .into_response())
}

pub async fn logout(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    if let Some(token) = session::session_token(&headers) {
        ctx.sessions.revoke(&token);
    }
    (
        [(SET_COOKIE, session::clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

pub async fn home(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(user) = authed_user(&ctx, &headers) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let ledger = ctx.ledger.lock();
    let username = ledger.username(user)?;
    let state = ledger.player_state(user)?;
    let upgrades = ledger
        .upgrade_levels(user)?
        .into_iter()
        .map(|(kind, level)| UpgradeStatus {
            upgrade_type: kind,
            level,
            next_cost: cost_at_level(&kind.definition(), level),
        })
        .collect();

    Ok(Json(HomeResponse {
        username,
        blocks: state.blocks,
        bpc: state.bpc,
        bps: state.bps,
        upgrades,
    })
    .into_response())
}

pub async fn leaderboard(State(ctx): State<Arc<AppContext>>) -> Result<Response, ApiError> {
    let users = ctx.ledger.lock().leaderboard()?;
    Ok(Json(LeaderboardResponse { users }).into_response())
}

pub async fn mine(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(user) = authed_user(&ctx, &headers) else {
        return Ok(Redirect::to("/login").into_response());
    };
    let blocks = ctx.ledger.lock().mine(user)?;
    Ok(Json(BlocksResponse { blocks }).into_response())
}

pub async fn auto_mine(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(user) = authed_user(&ctx, &headers) else {
        return Err(ApiError::unauthorized("Not logged in"));
    };
    let blocks = ctx.ledger.lock().passive_tick(user)?;
    Ok(Json(BlocksResponse { blocks }).into_response())
}

pub async fn upgrade(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let Some(user) = authed_user(&ctx, &headers) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let kind = body
        .get("upgrade_type")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<UpgradeKind>().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid upgrade type"))?;

    let receipt = ctx.ledger.lock().purchase_upgrade(user, kind)?;
    tracing::debug!(
        id = user.0,
        upgrade = %kind,
        level = receipt.level,
        "purchased upgrade"
    );

    Ok(Json(UpgradeResponse {
        blocks: receipt.state.blocks,
        bpc: receipt.state.bpc,
        bps: receipt.state.bps,
        level: receipt.level,
        next_cost: receipt.next_cost,
        upgrade_type: receipt.kind,
    })
    .into_response())
}
