use std::net::SocketAddr;

use bindery_sample::PetServer;
use bindery_sample::petstore::PetstoreController;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let addr: SocketAddr = std::env::var("PETSTORE_ADDR")
        .ok()
        .and_then(|addr| addr.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

    let router = PetstoreController::new(PetServer::new()).into_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "pet store listening");
    axum::serve(listener, router).await
}
