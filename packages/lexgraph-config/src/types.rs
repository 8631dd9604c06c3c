use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub store: Store,
	#[serde(default)]
	pub matching: Matching,
	#[serde(default)]
	pub confidence: Confidence,
	#[serde(default)]
	pub limits: Limits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_cors_origins")]
	pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Guards applied to every graph store query.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Store {
	pub query_timeout_ms: u64,
	/// Extra attempts after the first one, only for unavailable-store failures.
	pub max_retries: u32,
	pub retry_backoff_ms: u64,
}
impl Default for Store {
	fn default() -> Self {
		Self { query_timeout_ms: 2_000, max_retries: 2, retry_backoff_ms: 50 }
	}
}

/// Relevance weights for section matching. Normalized by their sum at use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub text_weight: f64,
	pub rule_weight: f64,
	pub jurisdiction_bonus: f64,
	pub category_bonus: f64,
	pub max_query_terms: u32,
	pub min_term_chars: u32,
	pub rule_section_limit: u32,
	pub text_section_limit: u32,
}
impl Matching {
	pub fn weight_sum(&self) -> f64 {
		self.text_weight + self.rule_weight + self.jurisdiction_bonus + self.category_bonus
	}
}
impl Default for Matching {
	fn default() -> Self {
		Self {
			text_weight: 0.45,
			rule_weight: 0.45,
			jurisdiction_bonus: 0.05,
			category_bonus: 0.05,
			max_query_terms: 8,
			min_term_chars: 4,
			rule_section_limit: 10,
			text_section_limit: 5,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Confidence {
	pub top_score_weight: f64,
	pub coverage_weight: f64,
	pub clarity_weight: f64,
	/// Matches scoring within this distance of the top match count as tied.
	pub tie_margin: f64,
}
impl Confidence {
	pub fn weight_sum(&self) -> f64 {
		self.top_score_weight + self.coverage_weight + self.clarity_weight
	}
}
impl Default for Confidence {
	fn default() -> Self {
		Self { top_score_weight: 0.5, coverage_weight: 0.3, clarity_weight: 0.2, tie_margin: 0.05 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
	pub max_outcomes: u32,
	pub max_related_sections: u32,
	pub search_limit: u32,
	pub search_min_chars: u32,
	pub graph_label_chars: u32,
}
impl Default for Limits {
	fn default() -> Self {
		Self {
			max_outcomes: 8,
			max_related_sections: 10,
			search_limit: 10,
			search_min_chars: 3,
			graph_label_chars: 30,
		}
	}
}

fn default_cors_origins() -> Vec<String> {
	vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()]
}
