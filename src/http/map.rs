//! The map UI page.
//!
//! The template is embedded at build time and rendered once at startup with
//! the public map token.

use axum::{extract::State, response::Html};

use crate::http::server::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const TOKEN_PLACEHOLDER: &str = "{{ mapbox_token }}";

/// Render the index page with the map display token.
pub fn render_index(map_token: &str) -> String {
    INDEX_TEMPLATE.replace(TOKEN_PLACEHOLDER, &escape_html(map_token))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_page.to_string())
}
