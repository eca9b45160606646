//! The `quizgrade grade` command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use quizgrade_core::engine::grade_submission;
use quizgrade_core::parser::parse_question_bank;
use quizgrade_core::report::SubmissionReport;
use quizgrade_core::statistics::summarize_by_kind;

use crate::config::QuizgradeConfig;

pub fn execute(
    bank_path: PathBuf,
    responses_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    stdout: bool,
    config: &QuizgradeConfig,
) -> Result<()> {
    let bank = parse_question_bank(&bank_path)?;
    let responses = load_responses(&responses_path)?;
    tracing::info!(
        bank = %bank.id,
        questions = bank.questions.len(),
        responses = responses.len(),
        "grading submission"
    );

    let report = grade_submission(&bank, &responses);

    if stdout {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
        let output = output.unwrap_or_else(|| config.output_dir.clone());
        let format = format.unwrap_or_else(|| config.default_format.clone());
        write_outputs(&report, &output, &format)?;
    }

    if config.fail_on_invalid && report.has_failures() {
        anyhow::bail!("{} question(s) could not be graded", report.failures.len());
    }

    Ok(())
}

fn load_responses(path: &Path) -> Result<HashMap<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| {
        format!(
            "responses file must be a JSON object keyed by question id: {}",
            path.display()
        )
    })
}

fn write_outputs(report: &SubmissionReport, output: &Path, format: &str) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let stem = format!("{}-{timestamp}", report.bank_id);

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{stem}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("{stem}.md"));
                std::fs::write(&path, report.to_markdown())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &SubmissionReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Score", "Marks", "Status"]);

    for item in &report.items {
        let (marks, status) = match item.marks_awarded {
            Some(m) => {
                let status = match item.result.is_correct {
                    Some(true) => "correct",
                    _ if item.result.score > 0.0 => "partial",
                    _ => "incorrect",
                };
                (format!("{m:.2} / {:.2}", item.marks), status)
            }
            None => (format!("- / {:.2}", item.marks), "manual"),
        };
        table.add_row(vec![
            Cell::new(&item.question_id),
            Cell::new(item.kind),
            Cell::new(format!("{} / {}", item.result.score, item.result.max_score)),
            Cell::new(marks),
            Cell::new(status),
        ]);
    }
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(&failure.question_id),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new(&failure.code),
        ]);
    }

    println!("{table}");
    println!(
        "Total: {:.2} / {:.2} ({:.1}%), {} pending manual grading, {} not graded",
        report.marks_awarded,
        report.total_marks,
        report.percentage,
        report.pending_manual,
        report.failures.len()
    );

    let by_kind = summarize_by_kind([report]);
    if by_kind.len() > 1 {
        let mut kinds = Table::new();
        kinds.set_header(vec!["Type", "Count", "Correct", "Manual", "Avg %"]);
        for (kind, stats) in &by_kind {
            kinds.add_row(vec![
                Cell::new(kind),
                Cell::new(stats.count),
                Cell::new(stats.correct),
                Cell::new(stats.pending_manual),
                Cell::new(format!("{:.1}%", stats.average_percentage)),
            ]);
        }
        println!("\n{kinds}");
    }
}
