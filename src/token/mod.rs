//! Token lifetimes of the wrappers.
//!
//! Tokens themselves are managed elsewhere; this service only reports how long they live.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::AppState;


pub type WrapperId = String;
pub type TokenLifeLength = String;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("unknown wrapper `{0}`")]
    UnknownWrapper(WrapperId),
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UnknownWrapper(_) => StatusCode::NOT_FOUND,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Looks up the token lifetime configured for a wrapper.
#[async_trait::async_trait]
pub trait TokenManager: Send + Sync {
    async fn token_life_length(&self, wrapper_id: &str) -> Result<TokenLifeLength, TokenError>;
}

/// A [`TokenManager`] answering from a fixed table, with an optional fallback.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredTokenManager {
    life_lengths: HashMap<WrapperId, TokenLifeLength>,
    default_life_length: Option<TokenLifeLength>,
}

impl ConfiguredTokenManager {
    /// Later entries for the same wrapper replace earlier ones.
    pub fn new(
        life_lengths: impl IntoIterator<Item = (WrapperId, TokenLifeLength)>,
        default_life_length: Option<TokenLifeLength>,
    ) -> Self {
        Self {
            life_lengths: life_lengths.into_iter().collect(),
            default_life_length,
        }
    }
}

#[async_trait::async_trait]
impl TokenManager for ConfiguredTokenManager {
    async fn token_life_length(&self, wrapper_id: &str) -> Result<TokenLifeLength, TokenError> {
        self.life_lengths
            .get(wrapper_id)
            .or(self.default_life_length.as_ref())
            .cloned()
            .ok_or_else(|| TokenError::UnknownWrapper(wrapper_id.to_owned()))
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenLifeLengthResponse {
    pub life_length: TokenLifeLength,
}

#[utoipa::path(
    get,
    path = "/token-life-length/{wrapper_id}",
    params(
        ("wrapper_id" = String, Path, description = "Identifier of the wrapper whose token lifetime is requested.")
    ),
    responses(
        (status = 200, description = "The configured token lifetime, always as a string.", body = TokenLifeLengthResponse),
        (status = 404, description = "No lifetime is configured for the wrapper.", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn token_life_length(
    State(state): State<AppState>,
    Path(wrapper_id): Path<WrapperId>,
) -> Result<Json<TokenLifeLengthResponse>, TokenError> {
    let life_length = state.token_manager.token_life_length(&wrapper_id).await?;

    tracing::debug!("Token life length of {:?} is {:?}", wrapper_id, life_length);

    Ok(Json(TokenLifeLengthResponse { life_length }))
}
