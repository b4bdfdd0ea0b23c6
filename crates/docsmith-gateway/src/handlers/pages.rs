//! HTML pages. Templates are embedded at build time; `{{ app_name }}` is the only placeholder.

use crate::app::AppState;
use axum::{extract::State, response::Html};

const INDEX: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/index.html"));
const MEETING_NOTES_FORM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/meeting_notes_form.html"
));
const RESULT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/result.html"));

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render(template: &str, state: &AppState) -> Html<String> {
    Html(template.replace("{{ app_name }}", &html_escape(&state.settings.app_name)))
}

/// Landing page listing document types.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    render(INDEX, &state)
}

pub async fn meeting_notes_form(State(state): State<AppState>) -> Html<String> {
    render(MEETING_NOTES_FORM, &state)
}

/// Result page; the streamed Markdown is rendered client-side.
pub async fn result(State(state): State<AppState>) -> Html<String> {
    render(RESULT, &state)
}
