use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

// The snowball English stop list Postgres applies in `to_tsquery('english', ...)`.
const STOPWORDS: &[&str] = &[
	"a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
	"as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
	"by", "can", "did", "do", "does", "doing", "don", "down", "during", "each", "few", "for",
	"from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
	"him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
	"me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
	"only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
	"should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
	"themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
	"under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
	"while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
	"yourselves",
];

pub fn is_stopword(word: &str) -> bool {
	STOPWORDS.binary_search(&word).is_ok()
}

/// Lowercased alphabetic words of at least `min_chars` characters that are not stopwords,
/// unique, in order of first appearance, capped at `max_terms`.
pub fn query_terms(text: &str, min_chars: usize, max_terms: usize) -> Vec<String> {
	let normalized: String = text.nfkc().collect::<String>().to_lowercase();
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for word in normalized.unicode_words() {
		if out.len() >= max_terms {
			break;
		}
		if word.chars().count() < min_chars
			|| !word.chars().all(char::is_alphabetic)
			|| is_stopword(word)
		{
			continue;
		}
		if seen.insert(word) {
			out.push(word.to_string());
		}
	}

	out
}

/// Stemmed, lowercased words found in `fields`; the searchable side of a term match.
pub fn field_terms<'a>(fields: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
	let mut out = HashSet::new();

	for field in fields {
		let normalized: String = field.nfkc().collect::<String>().to_lowercase();

		for word in normalized.unicode_words() {
			out.insert(stem(word).to_string());
		}
	}

	out
}

/// Fraction of `terms` whose stem appears in `haystack`, in [0, 1].
pub fn term_overlap(terms: &[String], haystack: &HashSet<String>) -> f64 {
	if terms.is_empty() {
		return 0.0;
	}

	let matched = terms.iter().filter(|term| haystack.contains(stem(term))).count();

	matched as f64 / terms.len() as f64
}

/// Strips one common English inflection so `cheated`, `cheating` and `cheats` meet at `cheat`.
pub fn stem(word: &str) -> &str {
	for suffix in ["ings", "ing", "ies", "ed", "es", "s"] {
		if let Some(base) = word.strip_suffix(suffix)
			&& base.chars().count() >= 3
		{
			return base;
		}
	}

	word
}
