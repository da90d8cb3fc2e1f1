/**
 * StudyHub Background Sync Agent
 *
 * Opens the local store, follows server reachability and replays queued
 * progress actions whenever the server becomes reachable again.
 */
use std::sync::Arc;
use studyhub::client::{
    Config, LocalStore, NetworkMonitor, NetworkStatus, ProgressApiClient, ReachabilityProbe,
    SyncCoordinator, TracingNotifier,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::load()?;
    tracing::info!(server = config.server_url(), "Starting sync agent");

    let api = Arc::new(ProgressApiClient::new(config.clone())?);
    let initial = NetworkStatus::from_online(api.is_reachable().await);
    let monitor = NetworkMonitor::new(initial);

    let database_path = config.database_path();
    let coordinator = match LocalStore::initialize(&database_path).await {
        Ok(store) => {
            tracing::info!(path = %database_path.display(), "Local store ready");
            SyncCoordinator::new(store, api.clone(), monitor.clone(), Arc::new(TracingNotifier))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Local store unavailable, offline support disabled");
            SyncCoordinator::online_only(api.clone(), monitor.clone(), Arc::new(TracingNotifier))
        }
    };
    let coordinator = Arc::new(coordinator.with_rejection_policy(config.rejection_policy()));

    let sync_task = coordinator.spawn();
    let probe_task = monitor.spawn_probe(api, config.probe_interval());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down sync agent");

    probe_task.abort();
    sync_task.abort();
    if let Some(store) = coordinator.store() {
        store.close().await;
    }

    Ok(())
}
