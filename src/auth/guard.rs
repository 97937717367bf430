use crate::auth::token::{Claims, Role, TokenCodec};
use crate::error::ApiError;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

/// Verified identity attached to the request by the guard. Handlers read it
/// through `Extension<AuthUser>`; the caller never supplies it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub full_name: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            role: claims.role,
            full_name: claims.full_name,
        }
    }
}

/// One guard, parameterized by the required role, instead of one copy of the
/// check per role.
#[derive(Clone)]
pub struct RoleGuard {
    pub tokens: TokenCodec,
    pub required: Role,
}

impl RoleGuard {
    pub fn new(tokens: TokenCodec, required: Role) -> Self {
        Self { tokens, required }
    }
}

/// Role-scoped bearer authentication middleware.
///
/// Missing header or token segment → 401; failed verification → 401;
/// valid token with the wrong role → 403. On success the decoded identity
/// is inserted into the request extensions and the request proceeds.
pub async fn require_role(
    State(guard): State<RoleGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let token = token
        .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".to_string()))?;

    let claims = guard.tokens.verify(token)?;

    if claims.role != guard.required {
        return Err(ApiError::Forbidden(format!(
            "{} access required",
            guard.required
        )));
    }

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
