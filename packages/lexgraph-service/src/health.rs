use serde::Serialize;

use crate::{Error, LexgraphService, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
	pub status: &'static str,
	pub database: &'static str,
}

impl LexgraphService {
	/// One store round trip. Any failure is reported as an unreachable database.
	pub async fn health(&self) -> Result<HealthStatus> {
		match self.store.ping().await {
			Ok(()) => Ok(HealthStatus { status: "ok", database: "connected" }),
			Err(err) => {
				tracing::warn!(error = %err, "Store health check failed.");

				Err(Error::StoreUnavailable {
					message: format!("Database unreachable: {}", err.message()),
				})
			},
		}
	}
}
