use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::email::Mailer;

/// Handed to every handler through `State<AppState>`; clones share the pool,
/// config and mailer.
#[derive(Clone)]
pub struct AppState {
    pub pool: marquee_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Delivers confirmation codes.
    pub mailer: Arc<dyn Mailer>,
}
