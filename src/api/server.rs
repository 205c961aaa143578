use crate::api::handlers::AppState;
use crate::api::routes;
use crate::errors::Error;
use std::net::SocketAddr;
use tracing::info;

/// Starts and runs the HTTP server using Axum web framework
///
/// # Arguments
/// * `port` - Port number to listen on for incoming HTTP connections
/// * `state` - Shared handler state
///
/// # Returns
/// * `Result<(), Error>` - Ok when the server shuts down cleanly
pub async fn launch_server(port: u16, state: AppState) -> Result<(), Error> {
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
