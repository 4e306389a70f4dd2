//! Webhook entry points.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use chrono::Local;
use intake_core::AnalysisRequest;
use intake_workflow::card_attachments;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::payload::{ReportNotification, WebhookPayload};
use crate::state::AppState;
use crate::transfer::transfer_document;
use crate::worker::Job;

/// Registry table whose INSERT notifications carry finished reports.
const REPORT_TABLE: &str = "analysis_reports";

/// `POST /webhook/pipefy` — the document ingestion entry point.
///
/// The signature header is accepted but not verified. Validation
/// failures are the only 4xx; everything after the decode is best-effort
/// and degrades the summary rather than failing the call. The analysis
/// itself is scheduled on the background queue, so the response returns
/// before it completes.
pub async fn card_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload: WebhookPayload =
        serde_json::from_slice(&body).map_err(|err| ApiError::Validation(err.to_string()))?;

    let card_id = payload.data.card.id.clone();
    let pipe_id = payload.pipe_id();
    let action = payload.data.action.as_deref().unwrap_or("unknown");
    info!(card_id = %card_id, pipe_id = ?pipe_id, action = %action, "card webhook received");

    let attachments = card_attachments(state.gateway.as_ref(), &card_id).await;
    let mut documents = Vec::new();
    for attachment in &attachments {
        if let Some(doc) = transfer_document(
            &state.downloads,
            state.store.as_ref(),
            &card_id,
            pipe_id.as_deref(),
            attachment,
        )
        .await
        {
            documents.push(doc);
        }
    }
    info!(
        card_id = %card_id,
        transferred = documents.len(),
        resolved = attachments.len(),
        "attachment transfer finished"
    );

    let checklist_url = resolve_checklist(&state).await;
    let documents_processed = documents.len();
    state.jobs.enqueue(Job::Analyze(AnalysisRequest {
        case_id: card_id.clone(),
        documents,
        checklist_url,
        current_date: Local::now().date_naive(),
        pipe_id: pipe_id.clone(),
    }));

    Ok(Json(json!({
        "status": "success",
        "message": format!(
            "webhook for card {card_id} processed, {documents_processed} documents transferred"
        ),
        "card_id": card_id,
        "pipe_id": pipe_id,
        "documents_processed": documents_processed,
        "crewai_analysis": "initiated_in_background",
    })))
}

/// `POST /webhook/report` — downstream notification that an analysis
/// report row was inserted; pushes the report into the card field from
/// the background queue.
pub async fn report_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let notification: ReportNotification =
        serde_json::from_slice(&body).map_err(|err| ApiError::Validation(err.to_string()))?;

    if notification.kind != "INSERT" || notification.table != REPORT_TABLE {
        info!(
            kind = %notification.kind,
            table = %notification.table,
            "report notification ignored"
        );
        return Ok(Json(json!({
            "status": "ignored",
            "reason": "not_report_insert",
        })));
    }

    let record = notification.record.unwrap_or_default();
    let status = record.status;
    let case_id = record.case_id.filter(|s| !s.is_empty());
    let report = record.report.filter(|s| !s.is_empty());
    let (Some(case_id), Some(report)) = (case_id, report) else {
        return Err(ApiError::BadNotification("case_id or report missing"));
    };

    info!(
        case_id = %case_id,
        status = ?status,
        chars = report.len(),
        "report notification accepted"
    );
    state.jobs.enqueue(Job::Publish {
        case_id: case_id.clone(),
        report,
    });

    Ok(Json(json!({
        "status": "success",
        "message": "report queued for card update",
        "case_id": case_id,
    })))
}

/// Checklist URL for the analysis request, falling back to the built-in
/// default on any lookup error or absence.
async fn resolve_checklist(state: &AppState) -> String {
    match state.store.checklist_url(&state.config.checklist_config).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            warn!(
                config = %state.config.checklist_config,
                "checklist config missing, using default"
            );
            state.config.fallback_checklist_url.clone()
        }
        Err(err) => {
            warn!(
                config = %state.config.checklist_config,
                error = %err,
                "checklist lookup failed, using default"
            );
            state.config.fallback_checklist_url.clone()
        }
    }
}
