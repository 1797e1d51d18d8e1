use std::path::Path;

use rb_core::Content;

pub fn run(path: &Path) -> Result<(), String> {
    let content = Content::from_path(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let report = rb_dsl::lint_content(&content);

    eprint!("{}", report.render());

    let errors = report.error_count();
    let warnings = report.warning_count();
    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
        return Err("lint failed with errors".into());
    }
    if warnings > 0 {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }

    println!("  All checks passed for '{}'.", path.display());
    println!(
        "  {} conditions, {} action strings",
        report.conditions_checked, report.actions_checked
    );
    Ok(())
}
