//! Static pages of the web front end.

use axum::response::Html;

const INDEX: &str = include_str!("templates/index.html");
const RESULTS: &str = include_str!("templates/results.html");
const DETAILS: &str = include_str!("templates/details.html");

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Search page.", body = String, content_type = "text/html"))
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX)
}

#[utoipa::path(
    get,
    path = "/results",
    responses((status = 200, description = "Result list page.", body = String, content_type = "text/html"))
)]
pub async fn results() -> Html<&'static str> {
    Html(RESULTS)
}

#[utoipa::path(
    get,
    path = "/details",
    responses((status = 200, description = "Result details page.", body = String, content_type = "text/html"))
)]
pub async fn details() -> Html<&'static str> {
    Html(DETAILS)
}
