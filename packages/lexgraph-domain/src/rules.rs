//! Keyword rules mapping plain-language complaints to case types.
//!
//! A rule fires when its stem occurs anywhere in the lowercased description, so stems such as
//! `misappropriat` cover every inflection.

/// (stem, case type ids) in evaluation order.
pub const KEYWORD_RULES: &[(&str, &[&str])] = &[
	("cheating", &["CHEATING_01", "CHEATING_02"]),
	("fraud", &["CHEATING_01", "CHEATING_02"]),
	("stolen", &["THEFT_01"]),
	("theft", &["THEFT_01"]),
	("assault", &["ASSAULT_01"]),
	("beat", &["ASSAULT_01"]),
	("murder", &["MURDER_01"]),
	("kill", &["MURDER_01"]),
	("defamation", &["DEFAMATION_01"]),
	("reputation", &["DEFAMATION_01"]),
	("harassment", &["HARASSMENT_01", "ASSAULT_01"]),
	("kidnap", &["KIDNAPPING_01"]),
	("abduct", &["KIDNAPPING_01"]),
	("dowry", &["DOWRY_01"]),
	("bribe", &["CORRUPTION_01"]),
	("trust", &["CRIMINAL_BREACH_TRUST_01"]),
	("misappropriat", &["CRIMINAL_BREACH_TRUST_01"]),
	("extort", &["EXTORTION_01"]),
	("blackmail", &["EXTORTION_01"]),
	("trespass", &["TRESPASS_01"]),
	("bigamy", &["BIGAMY_01"]),
	("cohabitat", &["COHABITATION_01"]),
	("forgery", &["FORGERY_01"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
	pub case_type_id: String,
	/// Every stem that fired for this case type, in rule order.
	pub keywords: Vec<String>,
}

/// Case types named by the rules that fire on `text`, in order of the first rule naming each.
pub fn fire(text: &str) -> Vec<RuleHit> {
	let lowered = text.to_lowercase();
	let mut hits: Vec<RuleHit> = Vec::new();

	for (stem, case_type_ids) in KEYWORD_RULES {
		if !lowered.contains(stem) {
			continue;
		}

		for case_type_id in case_type_ids.iter() {
			match hits.iter_mut().find(|hit| hit.case_type_id == *case_type_id) {
				Some(hit) => hit.keywords.push(stem.to_string()),
				None => hits.push(RuleHit {
					case_type_id: case_type_id.to_string(),
					keywords: vec![stem.to_string()],
				}),
			}
		}
	}

	hits
}
