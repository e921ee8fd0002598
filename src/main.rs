//! winbridge: WebSocket RPC server for remote window control.
//!
//! Accepts connections, reads one call envelope per frame, and dispatches it
//! against the window registry. Failure to bind the listener is the only fatal
//! error; everything after startup is isolated to the request that caused it.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use winbridge::connection::handle_connection;
use winbridge::dispatch::Dispatcher;
use winbridge::registry::WindowRegistry;
use winbridge::toolkit::{HeadlessToolkit, WindowToolkit};

#[derive(Parser)]
#[command(name = "winbridge", about = "RPC server for remote window control")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8082)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "winbridge=info".into()),
        )
        .init();

    let args = Args::parse();

    let registry = Arc::new(WindowRegistry::new());
    let toolkit: Arc<dyn WindowToolkit> = Arc::new(HeadlessToolkit::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&registry),
        Arc::clone(&toolkit),
    ));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");

    tracing::info!("winbridge listening on {}", addr);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let dispatcher = Arc::clone(&dispatcher);
                    tokio::spawn(async move {
                        match accept_async(stream).await {
                            Ok(ws) => handle_connection(ws, addr, dispatcher).await,
                            Err(e) => {
                                tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "TCP accept error");
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Destroy every window still registered before exiting.
    tracing::info!(windows = registry.len(), "shutting down");
    registry.drain(toolkit.as_ref());
}
