//! Session command - run one conversational session over stdin/stdout.
//!
//! Reads newline-delimited JSON tool requests and prints one string result
//! per request. On EOF or interrupt, the reaper is stopped and every live
//! memory session is closed.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use taliesin_agent::{Assistant, SessionRequest, UserMemoryProvider};
use taliesin_services::ServicesConfig;
use taliesin_session::{CacheConfig, spawn_reaper};

use super::Context;

/// Arguments for the session command.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Session metadata as JSON: {"user_id": "...", "access_token": "..."}
    #[arg(long, conflicts_with_all = ["user_id", "access_token"])]
    pub metadata: Option<String>,

    /// User the session belongs to
    #[arg(long)]
    pub user_id: Option<String>,

    /// Bearer token for the productivity services
    #[arg(long, env = "TALIESIN_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let request = parse_request(&args)?;

    let memory = ctx.loaded.config.memory.clone().unwrap_or_default();
    let services = ctx.loaded.config.services.clone().unwrap_or_default();

    let provider = UserMemoryProvider::new(memory.database_path.clone());
    let cache_config =
        CacheConfig::new().with_idle_timeout(Duration::from_secs(memory.idle_timeout_secs));
    let services_config = ServicesConfig::new()
        .with_gmail_base_url(&services.gmail_base_url)
        .with_calendar_base_url(&services.calendar_base_url)
        .with_tasks_base_url(&services.tasks_base_url)
        .with_timeout(Duration::from_secs(services.timeout_secs));

    let assistant = Assistant::new(provider, cache_config, services_config)?;

    // Background reaper is opt-in; the pre-session sweep always runs.
    let reaper_cancel = CancellationToken::new();
    let reaper = memory.sweep_interval_secs.map(|secs| {
        debug!(interval_secs = secs, "Starting background reaper");
        spawn_reaper(
            assistant.sessions().clone(),
            Duration::from_secs(secs),
            reaper_cancel.clone(),
        )
    });

    let session_ctx = assistant.begin(request).await?;
    info!(user_id = %session_ctx.user_id, "Serving tool requests on stdin");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let reply = assistant.handle_request(&session_ctx, line).await;
                        println!("{}", reply);
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupt received");
                break;
            }
        }
    }

    reaper_cancel.cancel();
    if let Some(handle) = reaper {
        let _ = handle.await;
    }
    assistant.shutdown().await;

    Ok(())
}

/// Build the session request from `--metadata` or the identity flags.
fn parse_request(args: &SessionArgs) -> Result<SessionRequest> {
    if let Some(metadata) = &args.metadata {
        return Ok(SessionRequest::from_metadata(metadata)?);
    }

    match (&args.user_id, &args.access_token) {
        (Some(user_id), Some(access_token)) => {
            anyhow::ensure!(!user_id.is_empty(), "user_id must not be empty");
            anyhow::ensure!(!access_token.is_empty(), "access_token must not be empty");
            Ok(SessionRequest::new(user_id, access_token))
        }
        _ => anyhow::bail!("Provide --metadata or both --user-id and --access-token"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
