use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::SessionClaims;

/// Extractor for the current session placed in extensions by the auth
/// middleware. Usage: `async fn handler(CurrentSession(session): CurrentSession)`
pub struct CurrentSession(pub SessionClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentSession)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
