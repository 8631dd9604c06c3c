//! Ordinal scales used by graph entities and edges.
//!
//! Store data carries these either as integers or as free-form labels; both forms are
//! accepted on the way in and anything outside the known vocabulary is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Rank given to `HAS_ACTION` sequence labels that are not part of the known vocabulary.
pub const UNRANKED_SEQUENCE: u32 = 4;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelOrNumber {
	Number(i64),
	Label(String),
}

/// Offense severity, 1 (least) through 5 (most severe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "LabelOrNumber", into = "u8")]
pub struct Severity(u8);
impl Severity {
	pub const MAX: u8 = 5;
	pub const MIN: u8 = 1;

	pub fn new(value: u8) -> Result<Self> {
		if !(Self::MIN..=Self::MAX).contains(&value) {
			return Err(Error::OutOfRange { field: "severity_level", value: value.to_string() });
		}

		Ok(Self(value))
	}

	pub fn parse(label: &str) -> Result<Self> {
		let norm = normalize_label(label);

		if let Ok(value) = norm.parse::<u8>() {
			return Self::new(value);
		}

		let value = match norm.as_str() {
			"low" | "minor" => 1,
			"medium" | "moderate" => 2,
			"high" | "serious" => 3,
			"very high" | "severe" | "grave" => 4,
			"critical" | "extreme" | "heinous" => 5,
			_ => return Err(Error::UnknownLabel { kind: "severity", label: label.to_string() }),
		};

		Ok(Self(value))
	}

	pub fn value(self) -> u8 {
		self.0
	}
}
impl TryFrom<LabelOrNumber> for Severity {
	type Error = Error;

	fn try_from(raw: LabelOrNumber) -> Result<Self> {
		match raw {
			LabelOrNumber::Number(value) => u8::try_from(value)
				.map_err(|_| Error::OutOfRange { field: "severity_level", value: value.to_string() })
				.and_then(Self::new),
			LabelOrNumber::Label(label) => Self::parse(&label),
		}
	}
}
impl From<Severity> for u8 {
	fn from(severity: Severity) -> Self {
		severity.0
	}
}

/// Three-step scale shared by risk level, legal weight and tamper risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "LabelOrNumber", rename_all = "lowercase")]
pub enum Level {
	Low,
	Medium,
	High,
}
impl Level {
	pub fn parse(kind: &'static str, label: &str) -> Result<Self> {
		match normalize_label(label).as_str() {
			"1" | "low" => Ok(Self::Low),
			"2" | "medium" | "moderate" => Ok(Self::Medium),
			"3" | "high" => Ok(Self::High),
			_ => Err(Error::UnknownLabel { kind, label: label.to_string() }),
		}
	}
}
impl TryFrom<LabelOrNumber> for Level {
	type Error = Error;

	fn try_from(raw: LabelOrNumber) -> Result<Self> {
		match raw {
			LabelOrNumber::Number(value) => Self::parse("level", &value.to_string()),
			LabelOrNumber::Label(label) => Self::parse("level", &label),
		}
	}
}

/// How strongly a section needs a piece of evidence. Orders strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum Necessity {
	Required,
	Recommended,
	Optional,
}
impl Necessity {
	pub fn parse(label: &str) -> Result<Self> {
		match normalize_label(label).as_str() {
			"required" | "must have" | "mandatory" => Ok(Self::Required),
			"recommended" | "good to have" => Ok(Self::Recommended),
			"optional" | "nice to have" => Ok(Self::Optional),
			_ => Err(Error::UnknownLabel { kind: "necessity", label: label.to_string() }),
		}
	}

	/// Keeps whichever of the two is stronger.
	pub fn strongest(self, other: Self) -> Self {
		self.min(other)
	}
}
impl TryFrom<String> for Necessity {
	type Error = Error;

	fn try_from(label: String) -> Result<Self> {
		Self::parse(&label)
	}
}
impl fmt::Display for Necessity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Required => "required",
			Self::Recommended => "recommended",
			Self::Optional => "optional",
		};

		f.write_str(label)
	}
}

/// Ordering hint for a `HAS_ACTION` edge: integers pass through, known labels map to ranks.
pub fn parse_sequence(raw: &LabelOrNumber) -> Result<u32> {
	match raw {
		LabelOrNumber::Number(value) => u32::try_from(*value)
			.map_err(|_| Error::OutOfRange { field: "sequence", value: value.to_string() }),
		LabelOrNumber::Label(label) => {
			let norm = normalize_label(label);

			if let Ok(value) = norm.parse::<u32>() {
				return Ok(value);
			}

			Ok(match norm.as_str() {
				"primary" => 1,
				"secondary" => 2,
				"alternative" => 3,
				_ => UNRANKED_SEQUENCE,
			})
		},
	}
}

pub(crate) fn deserialize_sequence<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw = LabelOrNumber::deserialize(deserializer)?;

	parse_sequence(&raw).map_err(serde::de::Error::custom)
}

fn normalize_label(label: &str) -> String {
	label
		.trim()
		.to_lowercase()
		.replace(['-', '_'], " ")
		.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn severity_accepts_numbers_and_labels() {
		assert_eq!(Severity::parse("3").map(Severity::value), Ok(3));
		assert_eq!(Severity::parse("Very High").map(Severity::value), Ok(4));
		assert!(Severity::parse("0").is_err());
		assert!(Severity::parse("unbearable").is_err());
	}

	#[test]
	fn necessity_orders_strongest_first() {
		assert_eq!(Necessity::parse("Must-have"), Ok(Necessity::Required));
		assert_eq!(Necessity::parse("Good-to-have"), Ok(Necessity::Recommended));
		assert_eq!(
			Necessity::Optional.strongest(Necessity::Required),
			Necessity::Required
		);
	}

	#[test]
	fn sequence_labels_rank_in_plan_order() {
		assert_eq!(parse_sequence(&LabelOrNumber::Label("Primary".to_string())), Ok(1));
		assert_eq!(parse_sequence(&LabelOrNumber::Label("Alternative".to_string())), Ok(3));
		assert_eq!(
			parse_sequence(&LabelOrNumber::Label("whenever".to_string())),
			Ok(UNRANKED_SEQUENCE)
		);
		assert_eq!(parse_sequence(&LabelOrNumber::Number(7)), Ok(7));
		assert!(parse_sequence(&LabelOrNumber::Number(-1)).is_err());
	}
}
