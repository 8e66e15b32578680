//! GraphQL worker binary.
//!
//! Reads one JSON request per line from stdin and writes one JSON response
//! per line to stdout. Logs go to stderr (set `RUST_LOG` to enable).

use std::sync::Arc;

use anyhow::Context;
use graphql_config::LanguageSettings;
use graphql_introspect::{HttpTransport, SchemaTransport};
use graphql_worker::{Host, MirrorModels, Request, Response, TextSource, WorkerAdapter};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    graphql_worker::init_tracing();

    let transport: Arc<dyn SchemaTransport> =
        Arc::new(HttpTransport::new().context("Failed to create HTTP transport")?);
    let models = Arc::new(MirrorModels::new());
    let adapter = WorkerAdapter::new(
        Arc::clone(&models) as Arc<dyn TextSource>,
        Some(transport),
        LanguageSettings::default(),
    );
    let host = Host::new(Arc::new(adapter), models);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "GraphQL worker started");

    let (tx, rx) = mpsc::unbounded_channel::<Response>();
    let writer = tokio::spawn(write_responses(rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request");
                let _ = tx.send(Response::malformed(&e));
                continue;
            }
        };

        // Buffer updates and shutdown are served in order; everything
        // else runs concurrently and may answer out of order.
        if request.is_buffer_update() || request.is_shutdown() {
            let shutdown = request.is_shutdown();
            let _ = tx.send(host.handle(request).await);
            if shutdown {
                break;
            }
        } else {
            let host = host.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(host.handle(request).await);
            });
        }
    }

    drop(tx);
    writer.await.context("Response writer task failed")??;
    tracing::info!("GraphQL worker stopped");
    Ok(())
}

async fn write_responses(mut rx: mpsc::UnboundedReceiver<Response>) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response).context("Failed to encode response")?;
        line.push(b'\n');
        stdout.write_all(&line).await?;
        stdout.flush().await?;
    }
    Ok(())
}
