//! Application state shared by route constructors.

use database::mongodb::{Client, Database};

/// Built once at startup and cloned into the routers that need it.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares one connection pool across clones
    pub mongo_client: Client,
    pub db: Database,
}
