pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("Unknown {kind} label {label:?}.")]
	UnknownLabel { kind: &'static str, label: String },
	#[error("{field} is out of range: {value}.")]
	OutOfRange { field: &'static str, value: String },
	#[error("{field} is required.")]
	Missing { field: &'static str },
}
