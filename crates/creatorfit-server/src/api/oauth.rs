//! Instagram connection flow.
//!
//! - `GET /auth/instagram/start?creator=<public_id>`: redirect to Instagram
//! - `GET /auth/instagram/callback`: finish the connection and qualify inline

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use chrono::Utc;
use creatorfit_core::CreatorStatus;
use creatorfit_db::NewSocialAccount;
use creatorfit_oauth::{sign_state, verify_state};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

const PLATFORM: &str = "instagram";
const CONNECTED_PAGE: &str = "/connected.html";
const FAILED_PAGE: &str = "/connect-failed.html";

#[derive(Debug, Deserialize)]
pub(super) struct StartQuery {
    creator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub(super) async fn start(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StartQuery>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;

    let Some(client) = state.instagram.as_ref() else {
        return Err(ApiError::new(
            rid,
            "service_unavailable",
            "Instagram connection is not configured",
        ));
    };

    let public_id = query
        .creator
        .as_deref()
        .and_then(|c| Uuid::parse_str(c.trim()).ok())
        .ok_or_else(|| {
            ApiError::new(rid, "validation_error", "'creator' must be a creator id (UUID)")
        })?;

    let creator = creatorfit_db::get_creator_by_public_id(&state.pool, public_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "creator not found"))?;

    if creator.status == CreatorStatus::Revoked.as_str() {
        return Err(ApiError::new(
            rid,
            "conflict",
            "this creator has revoked consent and cannot reconnect",
        ));
    }

    let oauth_state = sign_state(&state.config.oauth_state_secret, public_id, Utc::now())
        .map_err(|e| {
            tracing::error!(error = %e, "failed to sign OAuth state");
            ApiError::new(rid, "internal_error", "failed to start Instagram connection")
        })?;
    let url = client.authorize_url(&oauth_state);

    tracing::info!(creator_id = creator.id, "redirecting creator to Instagram");
    Ok(found(url.as_str()))
}

/// Never returns an error body: the creator's browser is always redirected to
/// one of the two result pages.
pub(super) async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    match complete_connection(&state, query).await {
        Ok(creator_id) => {
            tracing::info!(creator_id, "instagram connection completed");
            found(CONNECTED_PAGE)
        }
        Err(failure) => {
            tracing::warn!(stage = failure.stage, reason = %failure.reason, "instagram connection failed");
            found(&format!("{FAILED_PAGE}?reason={}", failure.stage))
        }
    }
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

struct CallbackFailure {
    stage: &'static str,
    reason: String,
}

fn fail(stage: &'static str, reason: impl std::fmt::Display) -> CallbackFailure {
    CallbackFailure {
        stage,
        reason: reason.to_string(),
    }
}

async fn complete_connection(state: &AppState, query: CallbackQuery) -> Result<i64, CallbackFailure> {
    let client = state
        .instagram
        .as_ref()
        .ok_or_else(|| fail("config", "Instagram connection is not configured"))?;

    if let Some(error) = query.error {
        let detail = query.error_description.unwrap_or_default();
        return Err(fail("denied", format!("{error}: {detail}")));
    }

    let oauth_state = query.state.ok_or_else(|| fail("state", "missing state"))?;
    let public_id = verify_state(&state.config.oauth_state_secret, &oauth_state, Utc::now())
        .map_err(|e| fail("state", e))?;

    let creator = creatorfit_db::get_creator_by_public_id(&state.pool, public_id)
        .await
        .map_err(|e| fail("creator", e))?
        .ok_or_else(|| fail("creator", format!("unknown creator {public_id}")))?;

    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| fail("code", "missing code"))?;

    let token = client
        .exchange_code(&code)
        .await
        .map_err(|e| fail("token", e))?;
    let profile = client
        .fetch_profile(&token.access_token)
        .await
        .map_err(|e| fail("profile", e))?;

    let (_, status) = creatorfit_db::upsert_social_account(
        &state.pool,
        creator.id,
        &NewSocialAccount {
            platform: PLATFORM,
            platform_user_id: &profile.id,
            username: profile.username.as_deref(),
            account_type: profile.account_type.as_deref(),
            media_count: profile.media_count,
            access_token: &token.access_token,
        },
    )
    .await
    .map_err(|e| fail("account", e))?;

    tracing::info!(creator_id = creator.id, %status, "instagram account stored");

    creatorfit_qualify::run_qualification(
        &state.pool,
        &state.signals,
        &state.taxonomy,
        state.config.zero_hit_policy,
        creator.id,
    )
    .await
    .map_err(|e| fail("qualify", e))?;

    Ok(creator.id)
}
