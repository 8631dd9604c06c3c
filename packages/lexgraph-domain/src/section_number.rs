use std::{cmp::Ordering, sync::LazyLock};

use regex::Regex;

static SECTION_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:[A-Za-z.]+\s+)?(\d+)\s*([A-Za-z]*)").ok()
});

/// Orders section numbers the way statutes list them: `120B` after `120A`, `406` before `420`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
	match (parse(a), parse(b)) {
		(Some((num_a, suffix_a)), Some((num_b, suffix_b))) => num_a
			.cmp(&num_b)
			.then_with(|| suffix_a.to_ascii_uppercase().cmp(&suffix_b.to_ascii_uppercase()))
			.then_with(|| a.cmp(b)),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => a.cmp(b),
	}
}

fn parse(number: &str) -> Option<(u64, &str)> {
	let captures = SECTION_NUMBER.as_ref()?.captures(number)?;
	let digits = captures.get(1)?.as_str().parse().ok()?;
	let suffix = captures.get(2).map(|m| m.as_str()).unwrap_or("");

	Some((digits, suffix))
}
