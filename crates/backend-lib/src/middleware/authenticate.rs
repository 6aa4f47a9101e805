use crate::member::MemberStore;
use crate::{error::AppError, AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use commerce_common::{HEADER_LOGIN_ID, HEADER_LOGIN_PW};
use std::sync::Arc;

/// Authentication middleware.
///
/// Attach with `route_layer` to the routes that require a member. Resolves
/// the credential headers through the authentication decider and inserts the
/// resulting `AuthenticatedIdentity` into the request extensions, where
/// handlers pick it up with the `Extension` extractor.
pub async fn require_member<S: MemberStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (login_id, password) = credential_headers(request.headers());

    let identity = state
        .auth
        .authenticate(login_id.unwrap_or_default(), password.unwrap_or_default())
        .await?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Read the login id and password headers. Non-UTF-8 values count as absent.
fn credential_headers(headers: &HeaderMap) -> (Option<&str>, Option<&str>) {
    let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());
    (header(HEADER_LOGIN_ID), header(HEADER_LOGIN_PW))
}
