use std::path::Path;

pub fn run(
    actions: &str,
    content: &Path,
    state: Option<&Path>,
    save: Option<&Path>,
) -> Result<(), String> {
    let content = super::load_content(content)?;
    let mut state = super::load_state(state, &content.config)?;

    let outcome = rb_fiction::execute(&mut state, &content, actions);
    super::print_outcome(&outcome);

    if let Some(path) = save {
        super::save_state(&state, path)?;
    }
    Ok(())
}
