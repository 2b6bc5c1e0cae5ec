use axum::response::Html;

/// Moves the URL fragment into the query string of `/token`.
pub const RELAY_SCRIPT: &str =
    r#"<script>location.replace("token?" + location.hash.slice(1));</script>"#;

pub async fn redirect() -> Html<&'static str> {
    Html(RELAY_SCRIPT)
}
