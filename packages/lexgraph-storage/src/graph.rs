use sqlx::PgPool;

use crate::{
	Error, Result,
	models::{
		ActionLinkRow, CaseTypeLinkRow, EvidenceLinkRow, OutcomeLinkRow, RelatedSectionRow,
		ScoredSectionRow, SectionQuery, SectionRow,
	},
};

// Binds $1 section ids, $2 case type ids, $3 state and $4 category.
const SECTION_PREDICATES: &str = "\
($1::text[] IS NULL OR s.section_id = ANY($1))
	AND ($2::text[] IS NULL OR EXISTS (
		SELECT 1 FROM section_case_types m
		WHERE m.section_id = s.section_id AND m.case_type_id = ANY($2)
	))
	AND ($3::text IS NULL
		OR cardinality(s.applicable_states) = 0
		OR EXISTS (
			SELECT 1 FROM unnest(s.applicable_states) AS st(name)
			WHERE lower(trim(st.name)) IN ('all india', lower(trim($3)))
		))
	AND ($4::text IS NULL OR lower(trim(s.category)) = lower(trim($4)))";

const SECTION_COLUMNS: &str = "\
	s.section_id,
	s.section_number,
	s.act_name,
	s.section_title,
	s.layman_explanation,
	s.category,
	s.severity_level,
	s.punishment_summary,
	s.max_punishment_years,
	s.cognizable,
	s.bailable,
	s.applicable_states,
	s.embedding_text";

pub async fn get_section(pool: &PgPool, section_id: &str) -> Result<SectionRow> {
	let sql = format!("SELECT {SECTION_COLUMNS}\nFROM legal_sections s\nWHERE s.section_id = $1");
	let row = sqlx::query_as::<_, SectionRow>(&sql).bind(section_id).fetch_optional(pool).await?;

	row.ok_or_else(|| Error::NotFound(format!("section not found; section_id={section_id}")))
}

/// Sections matching every constraint in `query`. With case type constraints the strongest
/// mapping comes first; otherwise sections come back in id order.
pub async fn find_sections(pool: &PgPool, query: &SectionQuery<'_>) -> Result<Vec<SectionRow>> {
	let sql = format!(
		"\
SELECT {SECTION_COLUMNS}
FROM legal_sections s
WHERE {SECTION_PREDICATES}
ORDER BY
	(
		SELECT max(m.relevance_score) FROM section_case_types m
		WHERE m.section_id = s.section_id AND m.case_type_id = ANY($2)
	) DESC NULLS LAST,
	s.section_id
LIMIT $5"
	);
	let rows = sqlx::query_as::<_, SectionRow>(&sql)
		.bind(query.section_ids)
		.bind(query.case_type_ids)
		.bind(query.state)
		.bind(query.category)
		.bind(query.limit)
		.fetch_all(pool)
		.await?;

	Ok(rows)
}

/// Full-text search over title, layman explanation and embedding text, restricted by the same
/// constraints as [`find_sections`] before the limit applies. `terms` are OR-ed; scores are
/// normalized into [0, 1).
pub async fn search_sections(
	pool: &PgPool,
	terms: &[String],
	query: &SectionQuery<'_>,
) -> Result<Vec<ScoredSectionRow>> {
	let terms = terms
		.iter()
		.filter(|term| !term.is_empty() && term.chars().all(char::is_alphabetic))
		.cloned()
		.collect::<Vec<_>>();

	if terms.is_empty() {
		return Ok(vec![]);
	}

	let tsquery = terms.join(" | ");
	let sql = format!(
		"\
SELECT {SECTION_COLUMNS},
	ts_rank_cd(s.search_document, q.query, 32)::float8 AS score
FROM legal_sections s, to_tsquery('english', $6) AS q(query)
WHERE s.search_document @@ q.query
	AND {SECTION_PREDICATES}
ORDER BY score DESC, s.section_id
LIMIT $5"
	);
	let rows = sqlx::query_as::<_, ScoredSectionRow>(&sql)
		.bind(query.section_ids)
		.bind(query.case_type_ids)
		.bind(query.state)
		.bind(query.category)
		.bind(query.limit)
		.bind(tsquery)
		.fetch_all(pool)
		.await?;

	Ok(rows)
}

pub async fn related_sections(pool: &PgPool, section_id: &str) -> Result<Vec<RelatedSectionRow>> {
	ensure_exists(pool, "legal_sections", "section_id", section_id).await?;

	let sql = format!(
		"\
SELECT {SECTION_COLUMNS},
	r.relationship_type,
	r.explanation
FROM section_relations r
JOIN legal_sections s ON s.section_id = r.to_section_id
WHERE r.from_section_id = $1
ORDER BY s.section_id, r.relationship_type"
	);
	let rows =
		sqlx::query_as::<_, RelatedSectionRow>(&sql).bind(section_id).fetch_all(pool).await?;

	Ok(rows)
}

pub async fn section_actions(pool: &PgPool, section_id: &str) -> Result<Vec<ActionLinkRow>> {
	ensure_exists(pool, "legal_sections", "section_id", section_id).await?;

	let rows = sqlx::query_as::<_, ActionLinkRow>(
		"\
SELECT
	a.action_id,
	a.action_name,
	a.action_type,
	a.authority_involved,
	a.prerequisites,
	a.cost_estimate_min,
	a.cost_estimate_max,
	a.online_possible,
	a.risk_level,
	a.procedure_steps,
	l.action_sequence,
	l.conditions_required
FROM section_actions l
JOIN legal_actions a ON a.action_id = l.action_id
WHERE l.section_id = $1
ORDER BY a.action_id",
	)
	.bind(section_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn section_evidence(pool: &PgPool, section_id: &str) -> Result<Vec<EvidenceLinkRow>> {
	ensure_exists(pool, "legal_sections", "section_id", section_id).await?;

	let rows = sqlx::query_as::<_, EvidenceLinkRow>(
		"\
SELECT
	e.evidence_id,
	e.evidence_name,
	e.evidence_type,
	e.description,
	e.legal_weight,
	e.evidence_source,
	e.storage_requirements,
	e.tamper_risk,
	l.necessity_level,
	l.how_it_proves
FROM section_evidence l
JOIN evidence e ON e.evidence_id = l.evidence_id
WHERE l.section_id = $1
ORDER BY e.evidence_id",
	)
	.bind(section_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn section_case_types(pool: &PgPool, section_id: &str) -> Result<Vec<CaseTypeLinkRow>> {
	ensure_exists(pool, "legal_sections", "section_id", section_id).await?;

	let rows = sqlx::query_as::<_, CaseTypeLinkRow>(
		"\
SELECT
	c.case_type_id,
	c.case_category,
	c.scenario_description,
	c.typical_duration_months,
	c.recommended_first_action,
	c.common_mistakes,
	l.relevance_score,
	l.conditions,
	l.exceptions
FROM section_case_types l
JOIN case_types c ON c.case_type_id = l.case_type_id
WHERE l.section_id = $1
ORDER BY c.case_type_id",
	)
	.bind(section_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn action_outcomes(pool: &PgPool, action_id: &str) -> Result<Vec<OutcomeLinkRow>> {
	ensure_exists(pool, "legal_actions", "action_id", action_id).await?;

	let rows = sqlx::query_as::<_, OutcomeLinkRow>(
		"\
SELECT
	o.outcome_id,
	o.outcome_description,
	o.outcome_type,
	o.typical_timeline_months,
	o.appeal_possible,
	o.precedent_cases,
	l.probability_percentage,
	l.influencing_factors
FROM action_outcomes l
JOIN outcomes o ON o.outcome_id = l.outcome_id
WHERE l.action_id = $1
ORDER BY o.outcome_id",
	)
	.bind(action_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

async fn ensure_exists(pool: &PgPool, table: &str, id_column: &str, id: &str) -> Result<()> {
	let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {id_column} = $1)");
	let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;

	if !exists {
		return Err(Error::NotFound(format!("{table} row not found; {id_column}={id}")));
	}

	Ok(())
}
