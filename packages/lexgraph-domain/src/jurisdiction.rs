use crate::entity::LegalSection;

pub const ALL_INDIA: &str = "All India";

/// Resolves the requested state, treating a blank or missing value as nationwide.
pub fn requested_state(state: Option<&str>) -> &str {
	match state.map(str::trim) {
		Some(state) if !state.is_empty() => state,
		_ => ALL_INDIA,
	}
}

pub fn is_all_india(state: &str) -> bool {
	state.trim().eq_ignore_ascii_case(ALL_INDIA)
}

/// A section applies when it is nationwide or names the requested state.
pub fn applies_in(section: &LegalSection, state: &str) -> bool {
	if section.applicable_states.is_empty() {
		return true;
	}

	section
		.applicable_states
		.iter()
		.any(|candidate| is_all_india(candidate) || same_label(candidate, state))
}

/// True only when the section names a concrete requested state, not just "All India".
pub fn names_state(section: &LegalSection, state: &str) -> bool {
	if is_all_india(state) {
		return false;
	}

	section.applicable_states.iter().any(|candidate| same_label(candidate, state))
}

pub fn category_matches(section: &LegalSection, category: Option<&str>) -> bool {
	match category.map(str::trim) {
		Some(category) if !category.is_empty() => same_label(&section.category, category),
		_ => true,
	}
}

pub fn same_label(a: &str, b: &str) -> bool {
	a.trim().eq_ignore_ascii_case(b.trim())
}

