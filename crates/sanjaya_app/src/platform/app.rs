use std::io;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use sanjaya_core::{Phase, WorkflowState};
use sanjaya_engine::{QueryEngine, ReportArchive, ReqwestStreamClient, WorkflowSession};
use sanjaya_logging::{sanjaya_info, sanjaya_warn};
use tokio_util::sync::CancellationToken;

use super::cli::Cli;
use super::config::AppConfig;
use super::logging;
use super::render::TerminalPresenter;
use super::report::ReportNavigator;

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;
    let settings = config.stream_settings(cli.endpoint.as_deref());
    let registry = Arc::new(config.registry());
    sanjaya_info!(
        "Starting sanjaya endpoint={} agents={}",
        settings.endpoint,
        registry.len()
    );

    let archive = (!cli.no_save).then(|| {
        ReportArchive::new(
            config.out_dir(cli.out_dir.as_deref()),
            Arc::new(|| chrono::Utc::now().to_rfc3339()),
        )
    });
    if let Some(archive) = &archive {
        sanjaya_info!("Archiving results under {:?}", archive.dir());
    }
    let query = cli.query_text();
    let mut navigator = ReportNavigator::new(io::stdout(), archive);
    navigator.set_query(query.trim());

    let mut session = WorkflowSession::new(
        WorkflowState::with_registry(registry),
        TerminalPresenter::new(io::stdout()),
        navigator,
    );
    let engine = QueryEngine::new(
        Box::new(ReqwestStreamClient::new(settings.clone())),
        settings.max_line_bytes,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let report = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                sanjaya_warn!("Interrupted; stopping stream");
                on_interrupt.cancel();
            }
        });
        engine.run(&mut session, &query, &cancel).await
    });

    if !report.accepted {
        bail!("query is empty");
    }
    match report.phase {
        Phase::Completed => {
            if let Some(path) = session.navigator().saved() {
                sanjaya_info!("Run {} archived at {:?}", report.run_id, path);
            }
            Ok(())
        }
        Phase::Errored => {
            let state = session.state();
            let detail = state
                .failure()
                .map(str::to_string)
                .or_else(|| state.messages().last().map(|m| m.content.clone()))
                .unwrap_or_else(|| "research run failed".to_string());
            Err(anyhow!(detail))
        }
        // Only cancellation leaves a run unfinished.
        Phase::Idle | Phase::Active => {
            println!("Cancelled.");
            Ok(())
        }
    }
}
