use axum::{
    body::Body, extract::Request, http::HeaderMap, http::StatusCode, middleware::Next,
    response::Response,
};

use contracts::system::auth::SessionClaims;

async fn claims_from_request(headers: &HeaderMap) -> Result<SessionClaims, StatusCode> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    super::jwt::validate_token(token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Middleware that requires a valid session token
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = claims_from_request(req.headers()).await?;

    // Hand the session to handlers through request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware that requires the leader role
pub async fn require_leader(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = claims_from_request(req.headers()).await?;

    if !claims.is_leader() {
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
