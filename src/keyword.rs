use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::api::AppState;

/// The keyword of the most recent search, shared between requests.
#[derive(Debug, Clone, Default)]
pub struct LastKeyword(Arc<RwLock<Option<String>>>);

impl LastKeyword {
    pub async fn record(&self, keyword: &str) {
        *self.0.write().await = Some(keyword.to_owned());
    }

    /// Empty until a search has been made.
    pub async fn current(&self) -> String {
        self.0.read().await.clone().unwrap_or_default()
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KeywordResponse {
    pub keyword: String,
}

#[utoipa::path(
    get,
    path = "/keyword",
    responses(
        (status = 200, description = "The keyword of the last search, empty if no search was made yet.", body = KeywordResponse)
    )
)]
#[instrument(skip_all)]
pub async fn keyword(State(state): State<AppState>) -> Json<KeywordResponse> {
    Json(KeywordResponse {
        keyword: state.keyword.current().await,
    })
}
