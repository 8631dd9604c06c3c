use std::{sync::Arc, time::Duration};

use lexgraph_domain::entity::LegalSection;

use crate::{
	BoxFuture, Error, Result,
	store::{GraphStore, Neighbor, Relationship, SectionFilter, TextHit},
};

/// Applies a per-query timeout to every read and retries reads that failed because the store
/// was unreachable. All [`GraphStore`] reads are idempotent, so a retry never changes results.
pub struct GuardedStore {
	inner: Arc<dyn GraphStore>,
	timeout: Duration,
	max_retries: u32,
	backoff: Duration,
}
impl GuardedStore {
	pub fn new(inner: Arc<dyn GraphStore>, cfg: &lexgraph_config::Store) -> Self {
		Self {
			inner,
			timeout: Duration::from_millis(cfg.query_timeout_ms),
			max_retries: cfg.max_retries,
			backoff: Duration::from_millis(cfg.retry_backoff_ms),
		}
	}

	async fn run<'a, T, F>(&'a self, op: &'static str, mut attempt: F) -> Result<T>
	where
		F: FnMut() -> BoxFuture<'a, Result<T>>,
	{
		let mut backoff = self.backoff;
		let mut retries = 0;

		loop {
			let err = match tokio::time::timeout(self.timeout, attempt()).await {
				Ok(Ok(value)) => return Ok(value),
				Ok(Err(err)) => err,
				Err(_) => Error::StoreUnavailable {
					message: format!("{op} timed out after {} ms", self.timeout.as_millis()),
				},
			};

			if !matches!(err, Error::StoreUnavailable { .. }) || retries >= self.max_retries {
				return Err(err);
			}

			retries += 1;

			tracing::warn!(op, retries, error = %err, "Store read failed. Retrying.");

			tokio::time::sleep(backoff).await;

			backoff = backoff.saturating_mul(2);
		}
	}
}
impl GraphStore for GuardedStore {
	fn get_section<'a>(&'a self, section_id: &'a str) -> BoxFuture<'a, Result<LegalSection>> {
		Box::pin(self.run("get_section", move || self.inner.get_section(section_id)))
	}

	fn find_sections<'a>(
		&'a self,
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<LegalSection>>> {
		Box::pin(self.run("find_sections", move || self.inner.find_sections(filter)))
	}

	fn neighbors<'a>(
		&'a self,
		id: &'a str,
		relationship: Relationship,
	) -> BoxFuture<'a, Result<Vec<Neighbor>>> {
		Box::pin(self.run("neighbors", move || self.inner.neighbors(id, relationship)))
	}

	fn search_by_text<'a>(
		&'a self,
		terms: &'a [String],
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<TextHit>>> {
		Box::pin(self.run("search_by_text", move || self.inner.search_by_text(terms, filter)))
	}

	/// Health checks want the raw answer, so pings are bounded by the timeout but never retried.
	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			match tokio::time::timeout(self.timeout, self.inner.ping()).await {
				Ok(result) => result,
				Err(_) => Err(Error::StoreUnavailable {
					message: format!("ping timed out after {} ms", self.timeout.as_millis()),
				}),
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicU32, Ordering};

	use super::*;

	/// Fails the first `failures` reads with `StoreUnavailable`, optionally stalling instead.
	struct FlakyStore {
		failures: u32,
		stall: bool,
		calls: AtomicU32,
	}
	impl FlakyStore {
		fn new(failures: u32, stall: bool) -> Self {
			Self { failures, stall, calls: AtomicU32::new(0) }
		}

		async fn attempt(&self) -> Result<Vec<TextHit>> {
			let call = self.calls.fetch_add(1, Ordering::SeqCst);

			if call < self.failures {
				if self.stall {
					tokio::time::sleep(Duration::from_secs(60)).await;
				}

				return Err(Error::StoreUnavailable { message: "connection refused".to_string() });
			}

			Ok(Vec::new())
		}
	}
	impl GraphStore for FlakyStore {
		fn get_section<'a>(&'a self, section_id: &'a str) -> BoxFuture<'a, Result<LegalSection>> {
			Box::pin(async move {
				Err(Error::NotFound { message: format!("section not found; section_id={section_id}") })
			})
		}

		fn find_sections<'a>(
			&'a self,
			_filter: &'a SectionFilter,
		) -> BoxFuture<'a, Result<Vec<LegalSection>>> {
			Box::pin(async { Ok(Vec::new()) })
		}

		fn neighbors<'a>(
			&'a self,
			_id: &'a str,
			_relationship: Relationship,
		) -> BoxFuture<'a, Result<Vec<Neighbor>>> {
			Box::pin(async { Ok(Vec::new()) })
		}

		fn search_by_text<'a>(
			&'a self,
			_terms: &'a [String],
			_filter: &'a SectionFilter,
		) -> BoxFuture<'a, Result<Vec<TextHit>>> {
			Box::pin(self.attempt())
		}

		fn ping(&self) -> BoxFuture<'_, Result<()>> {
			Box::pin(async { Ok(()) })
		}
	}

	fn guarded(inner: Arc<FlakyStore>, max_retries: u32) -> GuardedStore {
		let cfg = lexgraph_config::Store { query_timeout_ms: 50, max_retries, retry_backoff_ms: 1 };

		GuardedStore::new(inner, &cfg)
	}

	#[tokio::test]
	async fn unavailable_reads_are_retried_until_success() {
		let inner = Arc::new(FlakyStore::new(2, false));
		let store = guarded(inner.clone(), 2);
		let hits = store
			.search_by_text(&[], &SectionFilter::default())
			.await
			.expect("Third attempt must succeed.");

		assert!(hits.is_empty());
		assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn retries_are_bounded() {
		let inner = Arc::new(FlakyStore::new(10, false));
		let store = guarded(inner.clone(), 2);
		let err = store
			.search_by_text(&[], &SectionFilter::default())
			.await
			.expect_err("Reads must keep failing.");

		assert!(matches!(err, Error::StoreUnavailable { .. }));
		assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn stalled_reads_time_out_as_unavailable() {
		let inner = Arc::new(FlakyStore::new(1, true));
		let store = guarded(inner.clone(), 0);
		let err = store
			.search_by_text(&[], &SectionFilter::default())
			.await
			.expect_err("Stalled read must time out.");

		assert!(matches!(err, Error::StoreUnavailable { .. }));
		assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn not_found_is_not_retried() {
		let inner = Arc::new(FlakyStore::new(0, false));
		let store = guarded(inner.clone(), 3);
		let err = store.get_section("IPC_000").await.expect_err("Lookup must fail.");

		assert!(matches!(err, Error::NotFound { .. }));
	}
}
