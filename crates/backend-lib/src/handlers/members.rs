// ============================
// crates/backend-lib/src/handlers/members.rs
// ============================
//! Member endpoint handlers.
use crate::member::{MemberStore, RegisterCommand};
use crate::{error::AppError, AppState};
use axum::{extract::State, http::StatusCode, Extension, Json};
use commerce_common::{AuthenticatedIdentity, ChangePasswordRequest, MemberResponse, RegisterRequest};
use std::sync::Arc;

/// `POST /api/v1/members`
pub async fn register<S: MemberStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    let member = state.members.register(RegisterCommand::from(request)).await?;
    Ok((StatusCode::CREATED, Json(member.to_response())))
}

/// `GET /api/v1/members/me`
pub async fn get_me<S: MemberStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = state.members.get_member(&identity.login_id).await?;
    Ok(Json(member.to_response()))
}

/// `PATCH /api/v1/members/me/password`
pub async fn change_password<S: MemberStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = state
        .members
        .change_password(
            &identity.login_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;
    Ok(Json(member.to_response()))
}
