//! The `quizgrade render` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgrade_core::engine::{render_question, View};
use quizgrade_core::parser::parse_question_bank;

pub fn execute(bank_path: PathBuf, question_id: String, view: String) -> Result<()> {
    let view: View = view.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    let bank = parse_question_bank(&bank_path)?;
    let question = bank.find(&question_id).with_context(|| {
        format!("question '{question_id}' not found in bank '{}'", bank.id)
    })?;

    let rendered = render_question(question, view)?;
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    Ok(())
}
