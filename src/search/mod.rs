//! The signed user search against the Twitter v1.1 API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::api::AppState;

pub mod oauth;


use self::oauth::{Credentials, OAuthSigner, SigningError};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{status} {reason}")]
    Upstream { status: u16, reason: String },
    #[error("{0}")]
    Signing(#[from] SigningError),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

impl SearchError {
    fn response_text(&self) -> String {
        match self {
            Self::Upstream { .. } => format!("NOT OK {self}"),
            Self::Signing(_) | Self::Request(_) => format!("NOT OK Exception {self}"),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        tracing::warn!("User search failed: {}", self);
        (StatusCode::BAD_GATEWAY, self.response_text()).into_response()
    }
}

/// A single, fixed user search. Only the credentials and the search terms are configurable.
#[derive(Debug, Clone)]
pub struct UserSearch {
    client: Client,
    signer: OAuthSigner,
    endpoint: Url,
    keyword: String,
    count: u32,
}

impl UserSearch {
    pub fn new(
        client: Client,
        credentials: Credentials,
        endpoint: Url,
        keyword: String,
        count: u32,
    ) -> Self {
        Self {
            client,
            signer: OAuthSigner::new(credentials),
            endpoint,
            keyword,
            count,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The endpoint with `count` and `q` appended to its query.
    pub fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("count", &self.count.to_string())
            .append_pair("q", &self.keyword);
        url
    }

    /// Sends the signed request and returns the body of a `200 OK` answer.
    ///
    /// Line breaks of the body (`\n`, `\r\n` and lone `\r`) are dropped.
    #[instrument(name = "user_search", skip(self), fields(keyword = %self.keyword))]
    pub async fn search(&self) -> Result<String, SearchError> {
        let url = self.request_url();
        let authorization = self.signer.authorization_header("GET", &url, &[])?;

        tracing::debug!("Sending signed request to {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let body = response.text().await?;

        tracing::trace!("Received {} bytes", body.len());

        Ok(body.split(['\r', '\n']).collect())
    }
}

#[utoipa::path(
    get,
    path = "/search",
    responses(
        (status = 200, description = "`OK ` followed by the raw body returned by the user search API.", body = String, content_type = "text/plain"),
        (status = 502, description = "
`NOT OK <status> <reason>` if the user search API did not answer `200 OK`.

`NOT OK Exception <message>` if the request could not be signed or sent.", body = String, content_type = "text/plain")
    )
)]
#[instrument(skip_all)]
pub async fn search(State(state): State<AppState>) -> Result<String, SearchError> {
    state.keyword.record(state.search.keyword()).await;

    let body = state.search.search().await?;

    Ok(format!("OK {body}"))
}
