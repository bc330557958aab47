//! Recommendation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use recommendation::Recommendation;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /recommendations — recommendation for the token's user.
#[tracing::instrument(skip_all, fields(user_id = tracing::field::Empty))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
) -> Result<Json<Recommendation>, ApiError> {
    let claims = state.tokens.validate_token(&token.0).await?;
    tracing::Span::current().record("user_id", claims.user_id.as_i64());

    let recommendation = state.pipeline.get_recommendation(claims.user_id).await?;
    Ok(Json(recommendation))
}
