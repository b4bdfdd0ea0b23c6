//! `POST /api/generate/meeting-notes`: configuration check, validation, then the relay.

use crate::app::AppState;
use crate::error::ApiError;
use crate::relay;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Response,
};
use docsmith_core::{
    build_meeting_notes_prompt, DocumentPrompt, GenerationRequest, MeetingNotesRequest,
};
use serde_json::Value;

/// Parse the body as JSON. A request without a content type is read as JSON too; a
/// declared non-JSON type is refused.
fn json_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, ApiError> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let is_json = content_type
            .to_str()
            .ok()
            .and_then(|v| v.split(';').next())
            .map(|mime| {
                let mime = mime.trim().to_ascii_lowercase();
                mime == "application/json" || mime.ends_with("+json")
            })
            .unwrap_or(false);
        if !is_json {
            return Err(ApiError::UnsupportedMediaType);
        }
    }
    Ok(serde_json::from_slice(body)?)
}

pub async fn generate_meeting_notes(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if !state.settings.is_configured() {
        tracing::warn!(
            target: "docsmith::gateway",
            "Generation requested but ANTHROPIC_API_KEY is not set"
        );
        return Err(ApiError::NotConfigured);
    }

    let payload = json_body(&headers, &body)?;
    let request = MeetingNotesRequest::from_json(&payload)?;
    let prompt = build_meeting_notes_prompt(&request);

    tracing::info!(
        target: "docsmith::relay",
        document_type = MeetingNotesRequest::DOCUMENT_TYPE,
        model = %state.settings.model_name,
        tone = request.tone().as_str(),
        user_len = prompt.user.len(),
        "Starting generation relay"
    );

    let fragments = state.generator.stream_text(GenerationRequest::new(
        state.settings.model_name.as_str(),
        prompt.system,
        prompt.user,
    ));
    Ok(relay::sse_response(fragments))
}

#[cfg(test)]
mod tests {
    use crate::app::{build_app, AppState};
    use crate::relay::SSE_CONTENT_TYPE;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use docsmith_core::{
        FragmentStream, GenerationError, GenerationRequest, ScriptedGenerator, Settings,
        TextGenerator, MAX_OUTPUT_TOKENS, MEETING_NOTES_SYSTEM,
    };
    use futures_util::StreamExt;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    const URI: &str = "/api/generate/meeting-notes";

    fn valid_payload() -> Value {
        json!({
            "title": "Q1 Review",
            "date": "2026-02-14",
            "attendees": "Alice, Bob",
            "discussion_points": "Discussed Q1 results",
        })
    }

    fn configured() -> Settings {
        Settings::with_api_key("sk-ant-test")
    }

    async fn post(settings: Settings, generator: Arc<dyn TextGenerator>, body: Body) -> Response {
        build_app(AppState::new(settings, generator))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(URI)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_json(
        settings: Settings,
        generator: Arc<ScriptedGenerator>,
        payload: Value,
    ) -> Response {
        post(settings, generator, Body::from(payload.to_string())).await
    }

    async fn body_text(res: Response) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_service_answers_503_without_generating() {
        let generator = Arc::new(ScriptedGenerator::fragments(["never"]));
        let res = post_json(Settings::default(), generator.clone(), valid_payload()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(res).await;
        assert!(json["detail"].as_str().unwrap().contains("ANTHROPIC_API_KEY"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn unconfigured_check_precedes_validation() {
        let generator = Arc::new(ScriptedGenerator::default());
        let res = post_json(Settings::default(), generator.clone(), json!({})).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn empty_required_fields_are_422() {
        let generator = Arc::new(ScriptedGenerator::default());
        let res = post_json(
            configured(),
            generator.clone(),
            json!({ "title": "", "date": "", "attendees": "", "discussion_points": "" }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(res).await;
        let detail = json["detail"].as_array().unwrap();
        assert_eq!(detail.len(), 4);
        assert_eq!(detail[0]["type"], "string_too_short");
        assert_eq!(detail[0]["loc"], json!(["body", "title"]));
        assert!(detail[0]["msg"].is_string());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn bad_tone_is_422() {
        let mut payload = valid_payload();
        payload["tone"] = json!("shouty");
        let res = post_json(configured(), Arc::new(ScriptedGenerator::default()), payload).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(res).await;
        assert_eq!(json["detail"][0]["loc"], json!(["body", "tone"]));
    }

    #[tokio::test]
    async fn malformed_json_is_422() {
        let generator = Arc::new(ScriptedGenerator::default());
        let res = post(configured(), generator.clone(), Body::from("{\"title\": ")).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(res).await;
        assert_eq!(json["detail"][0]["type"], "json_invalid");
        assert_eq!(json["detail"][0]["loc"], json!(["body"]));
        assert_eq!(generator.calls(), 0);
    }

    async fn post_with_content_type(content_type: Option<&str>, body: String) -> Response {
        let mut builder = Request::builder().method("POST").uri(URI);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        build_app(AppState::new(
            configured(),
            Arc::new(ScriptedGenerator::fragments(["ok"])),
        ))
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn body_without_content_type_is_read_as_json() {
        let res = post_with_content_type(None, valid_payload().to_string()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "data: ok\n\ndata: [DONE]\n\n");
    }

    #[tokio::test]
    async fn json_content_type_with_charset_is_accepted() {
        let res = post_with_content_type(
            Some("application/json; charset=utf-8"),
            valid_payload().to_string(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_json_content_type_is_415() {
        let res = post_with_content_type(Some("text/plain"), valid_payload().to_string()).await;
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json = body_json(res).await;
        assert!(json["detail"].as_str().unwrap().contains("application/json"));
    }

    #[tokio::test]
    async fn empty_body_without_content_type_is_422() {
        let res = post_with_content_type(None, String::new()).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(res).await;
        assert_eq!(json["detail"][0]["type"], "json_invalid");
    }

    #[tokio::test]
    async fn fragments_are_framed_then_done() {
        let generator = Arc::new(ScriptedGenerator::fragments([
            "# Meeting",
            " Notes\n",
            "Content here",
        ]));
        let res = post_json(configured(), generator.clone(), valid_payload()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], SSE_CONTENT_TYPE);
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(
            body_text(res).await,
            "data: # Meeting\n\ndata:  Notes\n\n\ndata: Content here\n\ndata: [DONE]\n\n"
        );

        let sent = generator.last_request().unwrap();
        assert_eq!(generator.calls(), 1);
        assert_eq!(sent.model, configured().model_name);
        assert_eq!(sent.max_tokens, MAX_OUTPUT_TOKENS);
        assert_eq!(sent.system, MEETING_NOTES_SYSTEM);
        assert!(sent.user.contains("Q1 Review"));
        assert!(sent.user.contains("Not provided"));
    }

    #[tokio::test]
    async fn upstream_failure_ends_with_error_frame() {
        let generator = Arc::new(ScriptedGenerator::from_script(vec![
            Ok("partial".to_string()),
            Err("Overloaded".to_string()),
            Ok("never".to_string()),
        ]));
        let res = post_json(configured(), generator, valid_payload()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_text(res).await;
        assert_eq!(body, "data: partial\n\ndata: [ERROR] Overloaded\n\n");
        assert!(!body.contains("[DONE]"));
    }

    /// Splits a relay body the way the result page does: a frame ends where the next
    /// `\n\ndata: ` begins, and the last frame is the terminal one.
    fn split_frames(body: &str) -> (Vec<&str>, &str) {
        let mut rest = body;
        let mut fragments = Vec::new();
        while let Some(at) = rest.get(6..).and_then(|tail| tail.find("\n\ndata: ")) {
            let at = at + 6;
            fragments.push(&rest["data: ".len()..at]);
            rest = &rest[at + 2..];
        }
        let terminal = rest
            .strip_prefix("data: ")
            .and_then(|r| r.strip_suffix("\n\n"))
            .unwrap_or(rest);
        (fragments, terminal)
    }

    #[tokio::test]
    async fn newline_edged_fragments_survive_the_frame_boundaries() {
        let sent = ["# Meeting", " Notes\n", "Content here", "\n- item", "", "\n\n## Next"];
        let generator = Arc::new(ScriptedGenerator::fragments(sent));
        let res = post_json(configured(), generator, valid_payload()).await;
        let body = body_text(res).await;
        let (fragments, terminal) = split_frames(&body);
        assert_eq!(fragments, sent);
        assert_eq!(terminal, "[DONE]");
        assert_eq!(fragments.concat(), "# Meeting Notes\nContent here\n- item\n\n## Next");
    }

    /// Generator fed from a channel, so the test controls when each fragment exists.
    struct ChannelGenerator {
        rx: Mutex<Option<mpsc::UnboundedReceiver<Result<String, GenerationError>>>>,
    }

    impl TextGenerator for ChannelGenerator {
        fn stream_text(&self, _request: GenerationRequest) -> FragmentStream {
            let rx = self.rx.lock().unwrap().take().expect("single use");
            futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            })
            .boxed()
        }
    }

    fn channel_generator() -> (
        mpsc::UnboundedSender<Result<String, GenerationError>>,
        Arc<ChannelGenerator>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Arc::new(ChannelGenerator { rx: Mutex::new(Some(rx)) }))
    }

    #[tokio::test]
    async fn frames_are_flushed_as_fragments_arrive() {
        let (tx, generator) = channel_generator();
        let res = post(configured(), generator, Body::from(valid_payload().to_string())).await;
        assert_eq!(res.status(), StatusCode::OK);
        let mut frames = res.into_body().into_data_stream();

        tx.send(Ok("first".to_string())).unwrap();
        assert_eq!(&frames.next().await.unwrap().unwrap()[..], b"data: first\n\n");

        tx.send(Ok("second".to_string())).unwrap();
        assert_eq!(&frames.next().await.unwrap().unwrap()[..], b"data: second\n\n");

        drop(tx);
        assert_eq!(&frames.next().await.unwrap().unwrap()[..], b"data: [DONE]\n\n");
        assert!(frames.next().await.is_none());
    }

    #[tokio::test]
    async fn dropping_the_body_releases_upstream() {
        let (tx, generator) = channel_generator();
        let res = post(configured(), generator, Body::from(valid_payload().to_string())).await;
        let mut frames = res.into_body().into_data_stream();
        tx.send(Ok("first".to_string())).unwrap();
        assert!(frames.next().await.is_some());
        assert!(!tx.is_closed());

        drop(frames);
        assert!(tx.is_closed());
    }
}
