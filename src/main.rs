//! pg-fortune server binary
//!
//! Configuration comes from `PG_FORTUNE_*` environment variables, logging
//! from `RUST_LOG`. Connect with:
//!
//! ```bash
//! psql -h 127.0.0.1 -p 5432
//! ```

use pg_fortune::responder::{CommandResponder, FortuneResponder, Responder};
use pg_fortune::server::{Server, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Environment variable: external program answering queries
const ENV_RESPONDER_CMD: &str = "PG_FORTUNE_RESPONDER_CMD";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let responder: Arc<dyn Responder> = match std::env::var(ENV_RESPONDER_CMD) {
        Ok(line) if !line.trim().is_empty() => {
            let command = CommandResponder::from_command_line(&line)?;
            tracing::info!(program = command.program(), "answering queries with external command");
            Arc::new(command)
        }
        _ => Arc::new(FortuneResponder::default()),
    };

    let server = Server::bind(config, responder).await?;
    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
