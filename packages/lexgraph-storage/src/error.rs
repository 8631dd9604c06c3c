#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Not found: {0}")]
	NotFound(String),
}
impl Error {
	/// Whether the failure means the database could not be reached or did not answer, as
	/// opposed to answering with data the caller cannot use.
	pub fn is_unavailable(&self) -> bool {
		match self {
			Self::Sqlx(err) => matches!(
				err,
				sqlx::Error::Io(_)
					| sqlx::Error::Tls(_)
					| sqlx::Error::Protocol(_)
					| sqlx::Error::PoolTimedOut
					| sqlx::Error::PoolClosed
					| sqlx::Error::WorkerCrashed
					| sqlx::Error::Database(_)
			),
			Self::NotFound(_) => false,
		}
	}
}
