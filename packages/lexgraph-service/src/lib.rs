pub mod analyze;
pub mod context;
pub mod graph_view;
pub mod health;
pub mod matcher;
pub mod outcomes;
pub mod planner;
pub mod search;
pub mod store;
pub mod trace;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use analyze::{AnalysisResult, AnalyzeRequest};
pub use error::{Error, Result};
pub use graph_view::{GraphEdge, GraphNode, GraphView};
pub use health::HealthStatus;
pub use search::{SearchResponse, SearchResult};
pub use store::{GraphStore, GuardedStore, MemoryGraph, PgGraphStore};

use lexgraph_config::Config;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct LexgraphService {
	pub cfg: Config,
	pub store: Arc<dyn GraphStore>,
}
impl LexgraphService {
	/// Wraps `store` in the configured timeout and retry guard.
	pub fn new(cfg: Config, store: Arc<dyn GraphStore>) -> Self {
		let store = Arc::new(GuardedStore::new(store, &cfg.store));

		Self { cfg, store }
	}
}
