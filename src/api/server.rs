use std::net::SocketAddr;
use std::sync::Arc;

use crate::{api::router::create_router, rates::RateProvider};

/// Bind and serve the API until the process is stopped.
pub async fn run_server(
    provider: Arc<dyn RateProvider>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_router(provider);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
