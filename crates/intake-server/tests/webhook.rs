//! End-to-end webhook handler tests over in-memory collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use intake_analysis::{AnalysisTransport, Reply, TransportError};
use intake_core::{AnalysisRequest, CardField, DocumentTag};
use intake_server::{AppState, Job, ServerConfig, card_webhook, report_webhook, worker};
use intake_store::MemoryStore;
use intake_workflow::{CardGateway, WorkflowError};
use tokio::sync::mpsc;

/// Gateway with a fixed field list; errors when `fields` is `None`.
struct FakeGateway {
    fields: Option<Vec<CardField>>,
}

#[async_trait]
impl CardGateway for FakeGateway {
    async fn card_fields(&self, card_id: &str) -> Result<Vec<CardField>, WorkflowError> {
        match &self.fields {
            Some(fields) => Ok(fields.clone()),
            None => Err(WorkflowError::CardNotFound(card_id.to_string())),
        }
    }

    async fn update_card_field(
        &self,
        card_id: &str,
        _field_id: &str,
        _new_value: &str,
    ) -> Result<String, WorkflowError> {
        Ok(card_id.to_string())
    }
}

/// Transport stub; webhook handlers never invoke analysis directly.
struct IdleTransport;

#[async_trait]
impl AnalysisTransport for IdleTransport {
    async fn health(&self) -> Result<u16, TransportError> {
        Ok(200)
    }

    async fn analyze(&self, _request: &AnalysisRequest) -> Result<Reply, TransportError> {
        Err(TransportError::Timeout)
    }
}

fn attachment_field(urls: &str) -> CardField {
    CardField {
        id: Some("anexos".into()),
        label: Some("Anexos".into()),
        field_type: Some("attachment".into()),
        name: "Anexos".into(),
        value: Some(urls.to_string()),
    }
}

struct Harness {
    state: AppState,
    store: Arc<MemoryStore>,
    jobs_rx: mpsc::Receiver<Job>,
}

fn harness(fields: Option<Vec<CardField>>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let (jobs, jobs_rx) = worker::queue(8);
    let state = AppState {
        gateway: Arc::new(FakeGateway { fields }),
        store: store.clone(),
        analysis: Arc::new(IdleTransport),
        downloads: reqwest::Client::new(),
        jobs,
        config: Arc::new(ServerConfig {
            checklist_config: "registration_checklist".into(),
            fallback_checklist_url: "https://store/checklist/checklist.pdf".into(),
            analysis_base_url: "https://analysis.example.com".into(),
        }),
    };
    Harness {
        state,
        store,
        jobs_rx,
    }
}

/// Serve fixed bytes on an ephemeral local port; returns the base URL.
async fn file_server() -> String {
    let app = Router::new()
        .route(
            "/uploads/contrato_social.pdf",
            get(|| async { &b"%PDF-1.4 contrato"[..] }),
        )
        .route(
            "/uploads/balanco_2025.pdf",
            get(|| async { &b"%PDF-1.4 balanco"[..] }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn malformed_body_is_rejected_with_no_side_effects() {
    let mut h = harness(Some(vec![]));

    for body in [
        &b"not json"[..],
        br#"{"data":{}}"#,
        br#"{"data":{"card":{}}}"#,
        br#"[1,2,3]"#,
    ] {
        let err = card_webhook(State(h.state.clone()), Bytes::copy_from_slice(body))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(h.store.object_count(), 0);
    assert_eq!(h.store.document_count(), 0);
    assert!(h.jobs_rx.try_recv().is_err());
}

#[tokio::test]
async fn gateway_failure_degrades_to_zero_documents() {
    let mut h = harness(None);

    let response = card_webhook(
        State(h.state.clone()),
        Bytes::from_static(br#"{"data":{"card":{"id":337366661}}}"#),
    )
    .await
    .unwrap();

    let body = response.0;
    assert_eq!(body["status"], "success");
    assert_eq!(body["card_id"], "337366661");
    assert_eq!(body["documents_processed"], 0);
    assert_eq!(body["crewai_analysis"], "initiated_in_background");

    // Analysis is still scheduled, with the fallback checklist.
    let job = h.jobs_rx.try_recv().unwrap();
    let Job::Analyze(request) = job else {
        panic!("expected analyze job");
    };
    assert_eq!(request.case_id, "337366661");
    assert!(request.documents.is_empty());
    assert_eq!(
        request.checklist_url,
        "https://store/checklist/checklist.pdf"
    );
}

#[tokio::test]
async fn attachments_are_transferred_and_analysis_scheduled() {
    let base = file_server().await;
    let urls = format!(
        r#"["{base}/uploads/contrato_social.pdf","{base}/uploads/balanco_2025.pdf","not-a-url"]"#
    );
    let mut h = harness(Some(vec![attachment_field(&urls)]));
    h.store
        .insert_checklist("registration_checklist", "https://store/custom/checklist.pdf");

    let body = br#"{"data":{"card":{"id":42,"pipe":{"id":7}},"action":"card.create"}}"#;
    let response = card_webhook(State(h.state.clone()), Bytes::from_static(body))
        .await
        .unwrap();

    assert_eq!(response.0["documents_processed"], 2);
    assert_eq!(response.0["pipe_id"], "7");

    let contrato = h.store.document("42", "contrato_social.pdf").unwrap();
    assert_eq!(contrato.tag, DocumentTag::SocialContract);
    assert_eq!(contrato.pipe_id.as_deref(), Some("7"));
    let balanco = h.store.document("42", "balanco_2025.pdf").unwrap();
    assert_eq!(balanco.tag, DocumentTag::BalanceSheet);

    let Job::Analyze(request) = h.jobs_rx.try_recv().unwrap() else {
        panic!("expected analyze job");
    };
    assert_eq!(request.documents.len(), 2);
    assert_eq!(request.checklist_url, "https://store/custom/checklist.pdf");
    assert_eq!(request.pipe_id.as_deref(), Some("7"));
}

#[tokio::test]
async fn broken_attachment_is_dropped_not_fatal() {
    let base = file_server().await;
    let urls = format!(
        r#"["{base}/uploads/contrato_social.pdf","{base}/uploads/does_not_exist.pdf"]"#
    );
    let mut h = harness(Some(vec![attachment_field(&urls)]));

    let response = card_webhook(
        State(h.state.clone()),
        Bytes::from_static(br#"{"data":{"card":{"id":"42"}}}"#),
    )
    .await
    .unwrap();

    assert_eq!(response.0["status"], "success");
    assert_eq!(response.0["documents_processed"], 1);
    assert_eq!(h.store.document_count(), 1);

    let Job::Analyze(request) = h.jobs_rx.try_recv().unwrap() else {
        panic!("expected analyze job");
    };
    assert_eq!(request.documents.len(), 1);
    assert_eq!(request.documents[0].name, "contrato_social.pdf");
}

#[tokio::test]
async fn report_notification_is_queued_for_publish() {
    let mut h = harness(Some(vec![]));

    let body = br#"{"type":"INSERT","table":"analysis_reports","record":{"case_id":"42","report":"all clear","status":"done"}}"#;
    let response = report_webhook(State(h.state.clone()), Bytes::from_static(body))
        .await
        .unwrap();

    assert_eq!(response.0["status"], "success");
    assert_eq!(response.0["case_id"], "42");

    let Job::Publish { case_id, report } = h.jobs_rx.try_recv().unwrap() else {
        panic!("expected publish job");
    };
    assert_eq!(case_id, "42");
    assert_eq!(report, "all clear");
}

#[tokio::test]
async fn unrelated_notifications_are_ignored() {
    let mut h = harness(Some(vec![]));

    for body in [
        &br#"{"type":"UPDATE","table":"analysis_reports","record":{"case_id":"42","report":"x"}}"#[..],
        br#"{"type":"INSERT","table":"documents","record":{"case_id":"42","report":"x"}}"#,
    ] {
        let response = report_webhook(State(h.state.clone()), Bytes::copy_from_slice(body))
            .await
            .unwrap();
        assert_eq!(response.0["status"], "ignored");
        assert_eq!(response.0["reason"], "not_report_insert");
    }

    assert!(h.jobs_rx.try_recv().is_err());
}

#[tokio::test]
async fn incomplete_report_notification_is_rejected() {
    let mut h = harness(Some(vec![]));

    for body in [
        &br#"{"type":"INSERT","table":"analysis_reports"}"#[..],
        br#"{"type":"INSERT","table":"analysis_reports","record":{"case_id":"42"}}"#,
        br#"{"type":"INSERT","table":"analysis_reports","record":{"case_id":"","report":"x"}}"#,
    ] {
        let err = report_webhook(State(h.state.clone()), Bytes::copy_from_slice(body))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    assert!(h.jobs_rx.try_recv().is_err());
}
