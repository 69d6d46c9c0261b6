use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tracing::warn;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::run_blocking;

/// Verify the `Authorization: Bearer` token and expose its `Claims` to the
/// handler as an `Extension`. No token, a bad signature, an expired token or
/// a token whose account is gone all end here with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| ApiError::Unauthorized)?;

    let claims = state.tokens.verify_token(bearer.token())?;

    // A re-registered username gets a new id, so old tokens stay dead
    let username = claims.username.clone();
    let sub = claims.sub.to_string();
    let live = run_blocking(move || {
        Ok(state
            .db
            .get_user_by_username(&username)?
            .is_some_and(|user| user.id == sub))
    })
    .await?;
    if !live {
        warn!("Token for deleted account {} rejected", claims.username);
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
