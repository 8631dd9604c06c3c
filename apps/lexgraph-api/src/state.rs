use std::sync::Arc;

use lexgraph_service::{LexgraphService, PgGraphStore};
use lexgraph_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LexgraphService>,
	db: Option<Arc<Db>>,
}
impl AppState {
	/// Connects the pool once and bootstraps the schema before any request is served.
	pub async fn new(config: lexgraph_config::Config) -> color_eyre::Result<Self> {
		let db = Arc::new(Db::connect(&config.storage.postgres).await?);

		db.ensure_schema().await?;

		let store = PgGraphStore::new(db.clone());
		let service = LexgraphService::new(config, Arc::new(store));

		Ok(Self { service: Arc::new(service), db: Some(db) })
	}

	/// State over an already built service. No pool is owned.
	pub fn from_service(service: LexgraphService) -> Self {
		Self { service: Arc::new(service), db: None }
	}

	pub async fn close(&self) {
		if let Some(db) = &self.db {
			db.close().await;
		}
	}
}
