use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rb_core::EngineConfig;
use rb_dsl::condition::{compare, read_query};
use rb_dsl::diagnostics::render_fragment;
use rb_dsl::{Condition, Diagnostic};

pub fn run(source: &str, state: Option<&Path>, explain: bool) -> Result<(), String> {
    let state = super::load_state(state, &EngineConfig::default())?;

    let condition = match Condition::parse(source) {
        Ok(condition) => condition,
        Err(e) => {
            let diagnostic = Diagnostic::from(&e);
            eprint!("{}", render_fragment("<condition>", source, &[diagnostic]));
            return Err(format!("condition rejected: {e}"));
        }
    };

    if explain && !condition.checks().is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Query", "Op", "Expected", "Actual", "Holds"]);
        for check in condition.checks() {
            let actual = read_query(&check.query, &state);
            let holds = compare(&actual, check.op, &check.expected);
            table.add_row(vec![
                format!("{:?}", check.query),
                check.op.to_string(),
                check.expected.to_string(),
                actual.to_string(),
                holds.to_string(),
            ]);
        }
        println!("{table}");
    }

    if condition.holds(&state) {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }
    Ok(())
}
