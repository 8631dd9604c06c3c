pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_legal_sections.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_legal_sections.sql")),
				"tables/002_legal_actions.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_legal_actions.sql")),
				"tables/003_case_types.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_case_types.sql")),
				"tables/004_evidence.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_evidence.sql")),
				"tables/005_outcomes.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_outcomes.sql")),
				"tables/006_section_relations.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_section_relations.sql")),
				"tables/007_section_actions.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_section_actions.sql")),
				"tables/008_section_evidence.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_section_evidence.sql")),
				"tables/009_section_case_types.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_section_case_types.sql")),
				"tables/010_action_outcomes.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_action_outcomes.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
