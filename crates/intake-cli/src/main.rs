//! Binary entry point: configuration, wiring, serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use intake_analysis::{HttpAnalysis, Invoker, SummarySink};
use intake_server::{AppState, CardSummarySink, ServerConfig, router, worker};
use intake_store::HttpStore;
use intake_workflow::{CardGateway, FieldTarget, WorkflowClient};
use tracing::info;

/// Card-document intake service.
#[derive(Parser, Debug)]
#[command(name = "intake", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "INTAKE_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Workflow API GraphQL endpoint.
    #[arg(
        long,
        env = "WORKFLOW_API_URL",
        default_value = "https://api.pipefy.com/graphql"
    )]
    workflow_url: String,

    /// Workflow API bearer token.
    #[arg(long, env = "WORKFLOW_API_TOKEN")]
    workflow_token: String,

    /// Object-store/registry base URL.
    #[arg(long, env = "STORE_URL")]
    store_url: String,

    /// Object-store service key.
    #[arg(long, env = "STORE_SERVICE_KEY")]
    store_key: String,

    /// Storage bucket for ingested documents.
    #[arg(long, env = "STORE_BUCKET", default_value = "documents")]
    bucket: String,

    /// Analysis service base URL.
    #[arg(long, env = "ANALYSIS_SERVICE_URL")]
    analysis_url: String,

    /// Label of the card field that receives the analysis summary.
    #[arg(long, env = "REPORT_FIELD_LABEL", default_value = "Informe CrewAI")]
    report_field: String,

    /// Checklist configuration row name.
    #[arg(long, env = "CHECKLIST_CONFIG", default_value = "registration_checklist")]
    checklist_config: String,

    /// Background job queue capacity.
    #[arg(long, env = "JOB_QUEUE_CAPACITY", default_value_t = 32)]
    queue_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let store = Arc::new(HttpStore::new(args.store_url, args.store_key, args.bucket));
    let analysis = Arc::new(HttpAnalysis::new(args.analysis_url));
    let gateway: Arc<dyn CardGateway> =
        Arc::new(WorkflowClient::new(args.workflow_url, args.workflow_token));

    let fallback_checklist_url = store.default_checklist_url();
    let analysis_base_url = analysis.base_url().to_string();
    info!(analysis = %analysis_base_url, "collaborators configured");

    let sink: Arc<dyn SummarySink> = Arc::new(CardSummarySink::new(
        gateway.clone(),
        FieldTarget::new(args.report_field),
    ));
    let invoker = Invoker::new(analysis.clone(), sink.clone());

    let (jobs, jobs_rx) = worker::queue(args.queue_capacity);
    let _worker = worker::spawn(jobs_rx, invoker, sink);

    let state = AppState {
        gateway,
        store,
        analysis,
        downloads: reqwest::Client::new(),
        jobs,
        config: Arc::new(ServerConfig {
            checklist_config: args.checklist_config,
            fallback_checklist_url,
            analysis_base_url,
        }),
    };

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .context("failed to bind listen address")?;
    info!(addr = %args.bind, "intake service listening");
    axum::serve(listener, router(state))
        .await
        .context("server error")?;

    Ok(())
}
