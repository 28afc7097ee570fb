//! Startup orchestration.
//!
//! Config is already validated by the time we get here. Order: build the
//! server (registry, remediator, router), bind, then serve. Any startup error
//! is fatal.

use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;

/// Bind and serve until SIGINT/SIGTERM.
pub async fn serve(config: ServiceConfig) -> Result<(), ServerError> {
    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "selfheal-api listening");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_signal());

    server.run(listener, server_shutdown).await
}
