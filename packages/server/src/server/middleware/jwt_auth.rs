use crate::common::MemberId;
use crate::domains::auth::JwtService;
use crate::server::error::ApiError;
use axum::{middleware::Next, response::Response, Extension};
use std::sync::Arc;
use tracing::debug;

/// Authenticated caller, taken from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub member_id: MemberId,
}

/// JWT authentication middleware
///
/// Verifies the bearer token, if any, and adds `AuthUser` to request
/// extensions. Requests without a valid token continue anonymously; handlers
/// that need a caller use [`require_auth`].
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &jwt_service) {
        debug!(member_id = %user.member_id, "Authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// The caller's member id, or 401.
pub fn require_auth(user: Option<Extension<AuthUser>>) -> Result<MemberId, ApiError> {
    user.map(|Extension(user)| user.member_id)
        .ok_or(ApiError::Unauthenticated)
}

fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Accept both "Bearer <token>" and a raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        member_id: claims.member_id(),
    })
}
