use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::keyword::{self, KeywordResponse, LastKeyword};
use crate::search::{self, UserSearch};
use crate::token::{self, ConfiguredTokenManager, ErrorResponse, TokenLifeLengthResponse, TokenManager};
use crate::views;

#[cfg(test)]
mod test;

#[derive(OpenApi)]
#[openapi(
    paths(
        views::index,
        views::results,
        views::details,
        token::token_life_length,
        keyword::keyword,
        search::search,
    ),
    components(schemas(TokenLifeLengthResponse, KeywordResponse, ErrorResponse)),
    info(title = "FuhSen web", description = "Pages, token lifetimes and the Twitter user search.")
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub token_manager: Arc<dyn TokenManager>,
    pub search: Arc<UserSearch>,
    pub keyword: LastKeyword,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.search_timeout_secs))
            .build()?;

        let search = UserSearch::new(
            client,
            config.credentials(),
            config.search_url.clone(),
            config.search_keyword.clone(),
            config.search_count,
        );

        let token_manager = ConfiguredTokenManager::new(
            config.token_life_lengths.iter().cloned(),
            config.default_token_life_length.clone(),
        );

        Ok(Self {
            token_manager: Arc::new(token_manager),
            search: Arc::new(search),
            keyword: LastKeyword::default(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(views::index))
        .route("/results", get(views::results))
        .route("/details", get(views::details))
        .route(
            "/token-life-length/:wrapper_id",
            get(token::token_life_length),
        )
        .route("/keyword", get(keyword::keyword))
        .route("/search", get(search::search))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
