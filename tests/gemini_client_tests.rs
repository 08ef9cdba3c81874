// Integration tests for the Gemini backend against a mock HTTP server

#[cfg(test)]
mod gemini_client_tests {
    use clove_lib::agents::{GeminiClient, GenerationParams, ModelBackend, ModelErrorKind};
    use clove_lib::config::GeneratorConfig;
    use clove_lib::{CodeGenerator, ManifestSource};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.0-flash";
    const ENDPOINT: &str = "/models/gemini-2.0-flash:generateContent";

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::with_base_url("test-key", server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        }))
    }

    async fn error_kind(status: u16, body: &str) -> ModelErrorKind {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;

        client(&server).probe(MODEL).await.unwrap_err().kind
    }

    #[tokio::test]
    async fn test_complete_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "hello"}]}],
                "generationConfig": {"topK": 40, "maxOutputTokens": 8192}
            })))
            .respond_with(text_response("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server)
            .complete(MODEL, "hello", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(text, "[]");
    }

    #[tokio::test]
    async fn test_probe_succeeds_on_any_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(body_partial_json(json!({"contents": [{"parts": [{"text": "test"}]}]})))
            .respond_with(text_response("ok"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client(&server).probe(MODEL).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_classification() {
        assert_eq!(
            error_kind(429, "Resource has been exhausted").await,
            ModelErrorKind::QuotaExceeded
        );
        assert_eq!(
            error_kind(404, "models/x is not found").await,
            ModelErrorKind::ModelUnavailable
        );
        assert_eq!(
            error_kind(400, "generateContent is not supported for this model").await,
            ModelErrorKind::ModelUnavailable
        );
        assert_eq!(
            error_kind(500, "internal error").await,
            ModelErrorKind::Other
        );
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        // Nothing listens on the discard port
        let client = GeminiClient::with_base_url(
            "SECRET-KEY-123",
            "http://127.0.0.1:9/v1beta",
            Duration::from_secs(2),
        )
        .unwrap();

        let error = client.probe(MODEL).await.unwrap_err();
        assert!(error.message.starts_with("generateContent request failed"));
        assert!(!error.message.contains("SECRET-KEY-123"));
        assert!(!error.message.contains("key="));
    }

    #[tokio::test]
    async fn test_api_key_is_not_in_the_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(text_response("ok"))
            .mount(&server)
            .await;

        client(&server).probe(MODEL).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.query(), None);
        assert_eq!(
            requests[0].headers.get("x-goog-api-key").unwrap(),
            "test-key"
        );
    }

    #[tokio::test]
    async fn test_response_without_text_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            )
            .mount(&server)
            .await;

        let error = client(&server)
            .complete(MODEL, "hello", &GenerationParams::default())
            .await
            .unwrap_err();
        assert_eq!(error.kind, ModelErrorKind::Other);
    }

    #[tokio::test]
    async fn test_generator_end_to_end_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gone-model:generateContent"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(text_response(
                "```json\n[{\"path\":\"index.html\",\"type\":\"file\",\"content\":\"<h1>Hi</h1>\"},]\n```",
            ))
            .expect(2)
            .mount(&server)
            .await;

        let config = GeneratorConfig {
            models: vec!["gone-model".to_string(), MODEL.to_string()],
            ..GeneratorConfig::default()
        };
        let generator = CodeGenerator::with_backend(Arc::new(client(&server)), &config).unwrap();

        let report = generator.generate_detailed("Say hi").await;

        assert_eq!(
            report.source,
            ManifestSource::Model {
                model_id: MODEL.to_string()
            }
        );
        assert_eq!(report.probe_failures[0].kind, ModelErrorKind::ModelUnavailable);
        assert_eq!(report.manifest.paths(), vec!["index.html"]);
    }
}
