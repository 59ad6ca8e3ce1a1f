//! Startup wiring: build the provider client and tool transport, select
//! cases, run the engine, print the summary.

use std::time::Duration;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use gauntlet_core::catalog::builtin_cases;
use gauntlet_core::engine::stats::summarize;
use gauntlet_core::engine::{RunConfig, RunEngine};
use gauntlet_core::errors::ConfigError;
use gauntlet_core::filter::filter_cases;
use gauntlet_core::providers::llm::{parse_model, ClientOpts, Provider};
use gauntlet_core::report::console::print_summary;
use gauntlet_core::report::progress::default_progress_sink;
use gauntlet_core::tool::{HttpToolServer, ToolTransport};
use gauntlet_core::trial::TrialConfig;

use crate::cli::args::Cli;
use crate::exit_codes;

const TOOL_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub async fn run(args: Cli) -> anyhow::Result<i32> {
    let (provider_name, model) = parse_model(&args.llm)?;
    let provider = Provider::parse(provider_name)?;
    let client = provider.build_client(model, args.llm_url.as_deref(), ClientOpts::default())?;

    let cases = filter_cases(&builtin_cases(), &args.filter, &args.tier)?;
    if cases.is_empty() {
        return Err(ConfigError::EmptySelection.into());
    }

    let cancel = CancellationToken::new();
    let tool_server = Arc::new(HttpToolServer::new(&args.tool_url, TOOL_REQUEST_TIMEOUT)?);
    let tools = tool_server.list_tools(&cancel).await?;

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling in-flight trials");
                cancel.cancel();
            }
        });
    }

    let config = RunConfig {
        num_runs: args.runs,
        concurrency: args.concurrency,
        trial: TrialConfig {
            max_attempts: args.max_attempts,
            max_iters: args.max_iters,
            ..TrialConfig::default()
        },
    };

    let total = cases.len() * args.runs as usize;
    let engine = RunEngine::new(client, tool_server, tools, config);
    let results = engine
        .run(cases, cancel.clone(), default_progress_sink(total))
        .await;

    let summary = summarize(&results);
    print_summary(&args.llm, &results, &summary);

    Ok(exit_codes::SUCCESS)
}
