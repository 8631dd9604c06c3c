mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Confidence, Limits, Matching, Postgres, Service, Storage, Store};

use std::{fs, path::Path};

const MAX_STORE_RETRIES: u32 = 10;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::invalid("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}
	if cfg.store.query_timeout_ms == 0 {
		return Err(Error::invalid("store.query_timeout_ms", "must be greater than zero."));
	}
	if cfg.store.max_retries > MAX_STORE_RETRIES {
		return Err(Error::invalid(
			"store.max_retries",
			format!("must be {MAX_STORE_RETRIES} or less."),
		));
	}

	for (key, weight) in [
		("matching.text_weight", cfg.matching.text_weight),
		("matching.rule_weight", cfg.matching.rule_weight),
		("matching.jurisdiction_bonus", cfg.matching.jurisdiction_bonus),
		("matching.category_bonus", cfg.matching.category_bonus),
		("confidence.top_score_weight", cfg.confidence.top_score_weight),
		("confidence.coverage_weight", cfg.confidence.coverage_weight),
		("confidence.clarity_weight", cfg.confidence.clarity_weight),
	] {
		check_weight(key, weight)?;
	}

	if cfg.matching.weight_sum() <= 0.0 {
		return Err(Error::invalid("matching", "weights must not all be zero."));
	}
	if cfg.confidence.weight_sum() <= 0.0 {
		return Err(Error::invalid("confidence", "weights must not all be zero."));
	}
	if !cfg.confidence.tie_margin.is_finite() || !(0.0..=1.0).contains(&cfg.confidence.tie_margin)
	{
		return Err(Error::invalid("confidence.tie_margin", "must be in the range 0.0-1.0."));
	}

	for (key, value) in [
		("matching.max_query_terms", cfg.matching.max_query_terms),
		("matching.min_term_chars", cfg.matching.min_term_chars),
		("matching.rule_section_limit", cfg.matching.rule_section_limit),
		("matching.text_section_limit", cfg.matching.text_section_limit),
		("limits.max_outcomes", cfg.limits.max_outcomes),
		("limits.max_related_sections", cfg.limits.max_related_sections),
		("limits.search_limit", cfg.limits.search_limit),
		("limits.search_min_chars", cfg.limits.search_min_chars),
		("limits.graph_label_chars", cfg.limits.graph_label_chars),
	] {
		if value == 0 {
			return Err(Error::invalid(key, "must be greater than zero."));
		}
	}

	Ok(())
}

fn check_weight(key: &'static str, weight: f64) -> Result<()> {
	if !weight.is_finite() {
		return Err(Error::invalid(key, "must be a finite number."));
	}
	if weight < 0.0 {
		return Err(Error::invalid(key, "must be zero or greater."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.cors_origins.retain(|origin| !origin.trim().is_empty());

	for origin in &mut cfg.service.cors_origins {
		*origin = origin.trim().trim_end_matches('/').to_string();
	}
}
