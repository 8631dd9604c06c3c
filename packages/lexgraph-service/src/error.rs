pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Store unavailable: {message}")]
	StoreUnavailable { message: String },
	#[error("Internal inconsistency: {message}")]
	InternalInconsistency { message: String },
}
impl Error {
	pub fn invalid_input(message: impl Into<String>) -> Self {
		Self::InvalidInput { message: message.into() }
	}

	pub fn inconsistency(message: impl Into<String>) -> Self {
		Self::InternalInconsistency { message: message.into() }
	}

	pub fn message(&self) -> &str {
		match self {
			Self::InvalidInput { message }
			| Self::NotFound { message }
			| Self::StoreUnavailable { message }
			| Self::InternalInconsistency { message } => message,
		}
	}
}

impl From<lexgraph_storage::Error> for Error {
	fn from(err: lexgraph_storage::Error) -> Self {
		if err.is_unavailable() {
			return Self::StoreUnavailable { message: err.to_string() };
		}

		match err {
			lexgraph_storage::Error::NotFound(message) => Self::NotFound { message },
			lexgraph_storage::Error::Sqlx(inner) => Self::InternalInconsistency {
				message: format!("store returned unusable data: {inner}"),
			},
		}
	}
}

impl From<lexgraph_domain::Error> for Error {
	fn from(err: lexgraph_domain::Error) -> Self {
		Self::InternalInconsistency { message: err.to_string() }
	}
}
