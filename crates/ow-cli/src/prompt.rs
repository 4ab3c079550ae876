use std::io::IsTerminal;

use dialoguer::{Confirm, Input};

/// True when a person can answer prompts.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Yes/no question, defaulting to no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new().with_prompt(question).default(false).interact()?)
}

/// Free-text answer, trimmed.
pub fn input(question: &str) -> anyhow::Result<String> {
    let answer: String = Input::new().with_prompt(question).allow_empty(true).interact_text()?;
    Ok(answer.trim().to_string())
}
