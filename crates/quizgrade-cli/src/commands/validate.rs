//! The `quizgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgrade_core::parser::{load_question_directory, parse_question_bank, validate_question_bank};

use crate::config::QuizgradeConfig;

pub fn execute(bank_path: PathBuf, strict: bool, config: &QuizgradeConfig) -> Result<()> {
    let banks = if bank_path.is_dir() {
        load_question_directory(&bank_path)?
    } else {
        vec![parse_question_bank(&bank_path)?]
    };

    if banks.is_empty() {
        anyhow::bail!("no question banks found in {}", bank_path.display());
    }

    let mut total_warnings = 0;

    for bank in &banks {
        println!(
            "Question bank: {} ({} questions, {} marks)",
            bank.name,
            bank.questions.len(),
            bank.total_marks()
        );

        let warnings = validate_question_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
        if strict || config.fail_on_invalid {
            anyhow::bail!("validation failed with {total_warnings} warning(s)");
        }
    }

    Ok(())
}
