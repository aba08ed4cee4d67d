use config::Config;
use std::sync::Arc;
use store::FileStore;
use upstream::UpstreamCache;

pub mod config;
pub mod error;
pub mod middleware;
pub mod mock;
pub mod models;
pub mod router;
pub mod store;
pub mod upstream;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: FileStore,
    pub upstream: Arc<UpstreamCache>,
}
