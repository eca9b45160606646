//! Question bank parser.
//!
//! Loads question banks from TOML or JSON files and directories, and
//! validates them.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::handlers::comprehension::sub_type;
use crate::model::{QuestionBank, QuestionDefinition, QuestionKind};
use crate::registry;

/// On-disk encoding of a question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    Toml,
    Json,
}

impl BankFormat {
    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for BankFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(BankFormat::Toml),
            "json" => Ok(BankFormat::Json),
            other => Err(format!("unknown question bank format: {other}")),
        }
    }
}

/// Intermediate structure shared by both encodings.
#[derive(Debug, Deserialize)]
struct BankFile {
    bank: BankHeader,
    #[serde(default)]
    questions: Vec<QuestionDefinition>,
}

#[derive(Debug, Deserialize)]
struct BankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

/// Parse a single question bank file. The format follows the extension.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let format = BankFormat::from_path(path).with_context(|| {
        format!(
            "cannot infer question bank format from extension: {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, format)
        .with_context(|| format!("failed to parse question bank: {}", path.display()))
}

/// Parse question bank content in the given format (useful for testing).
pub fn parse_question_bank_str(content: &str, format: BankFormat) -> Result<QuestionBank> {
    let parsed: BankFile = match format {
        BankFormat::Toml => toml::from_str(content).context("invalid TOML")?,
        BankFormat::Json => serde_json::from_str(content).context("invalid JSON")?,
    };

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions: parsed.questions,
    })
}

/// Recursively load all `.toml` and `.json` question banks from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_question_directory(&path)?);
        } else if BankFormat::from_path(&path).is_some() {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from question bank validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a question bank for authoring problems.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question bank has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(question.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &bank.questions {
        if question.marks <= 0.0 {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("marks must be positive, got {}", question.marks),
            ));
        }

        let Some(handler) = registry::get_handler(&question.question_type) else {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("unsupported question type: {}", question.question_type),
            ));
            continue;
        };

        if handler.kind() == QuestionKind::Comprehension {
            warnings.extend(check_sub_questions(question));
        }

        if !handler.validate(&question.definition) {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("definition is not a valid {} question", handler.kind()),
            ));
        }
    }

    warnings
}

/// Pinpoint sub-questions a comprehension cannot delegate to.
fn check_sub_questions(question: &QuestionDefinition) -> Vec<ValidationWarning> {
    let subs = question
        .definition
        .get("sub_questions")
        .and_then(|s| s.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();

    subs.iter()
        .enumerate()
        .filter_map(|(index, sub)| {
            let key = sub_type(sub);
            let message = match key.parse::<QuestionKind>() {
                Ok(QuestionKind::Comprehension) => format!(
                    "sub-question {} nests a comprehension question",
                    index + 1
                ),
                Ok(_) => return None,
                Err(_) => format!("sub-question {} has unsupported type: {key}", index + 1),
            };
            Some(ValidationWarning::question(&question.id, message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOML: &str = r#"
[bank]
id = "geography"
name = "Geography basics"
description = "Capitals and rivers"

[[questions]]
id = "capital-fr"
type = "mcq"
marks = 2

[questions.definition]
question_text = "What is the capital of France?"
options = [
    { text = "London", is_correct = false },
    { text = "Paris", is_correct = true },
]

[[questions]]
id = "rivers"
type = "cloze"

[questions.definition]
passage = "The longest river in Africa is the {b1}."
blanks = [{ id = "b1", correct_answers = ["Nile"], accept_partial = true }]

[questions.answer_schema]
case_sensitive_default = false
"#;

    const VALID_JSON: &str = r#"{
  "bank": {"id": "json-bank", "name": "JSON bank"},
  "questions": [
    {
      "id": "order-1",
      "type": "ordering",
      "definition": {
        "question_text": "Order the numbers.",
        "items": [3, 1, 2],
        "correct_order": [1, 2, 3]
      }
    }
  ]
}"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, BankFormat::Toml).unwrap();
        assert_eq!(bank.id, "geography");
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].marks, 2.0);
        assert_eq!(bank.questions[1].marks, 1.0);
        assert_eq!(bank.questions[1].kind().unwrap(), QuestionKind::Cloze);
        assert_eq!(
            bank.questions[0].definition["options"][1]["text"],
            "Paris"
        );
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_valid_json() {
        let bank = parse_question_bank_str(VALID_JSON, BankFormat::Json).unwrap();
        assert_eq!(bank.name, "JSON bank");
        assert_eq!(bank.questions[0].question_type, "ordering");
        assert!(bank.questions[0].answer_schema.is_object());
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_malformed_content() {
        assert!(parse_question_bank_str("this is not [valid toml }{", BankFormat::Toml).is_err());
        assert!(parse_question_bank_str("{\"questions\": []}", BankFormat::Json).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(BankFormat::from_path(Path::new("a/b.toml")), Some(BankFormat::Toml));
        assert_eq!(BankFormat::from_path(Path::new("b.JSON")), Some(BankFormat::Json));
        assert_eq!(BankFormat::from_path(Path::new("notes.md")), None);
        assert!(parse_question_bank(Path::new("notes.md")).is_err());
    }

    #[test]
    fn unknown_types_load_and_are_reported() {
        let toml = r#"
[bank]
id = "mixed"
name = "Mixed"

[[questions]]
id = "q1"
type = "essay"
marks = 0
"#;
        let bank = parse_question_bank_str(toml, BankFormat::Toml).unwrap();
        let warnings = validate_question_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("unsupported question type: essay")));
        assert!(warnings.iter().any(|w| w.message.contains("marks must be positive")));
    }

    #[test]
    fn validate_duplicate_ids_and_bad_definitions() {
        let toml = r#"
[bank]
id = "dupes"
name = "Dupes"

[[questions]]
id = "same"
type = "short_answer"
definition = { question_text = "Name a planet." }

[[questions]]
id = "same"
type = "matching"
definition = { question_text = "Match", matching_pairs = [] }
"#;
        let bank = parse_question_bank_str(toml, BankFormat::Toml).unwrap();
        let warnings = validate_question_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question ID: same")));
        assert!(warnings
            .iter()
            .any(|w| w.message == "definition is not a valid matching question"));
    }

    #[test]
    fn validate_comprehension_sub_types() {
        let json = r#"{
  "bank": {"id": "reading", "name": "Reading"},
  "questions": [{
    "id": "c1",
    "type": "comprehension",
    "definition": {
      "passage": {"content": "Bees make honey."},
      "sub_questions": [
        {"type": "essay", "question_text": "?"},
        {"type": "comprehension", "passage": {"content": "x"}, "sub_questions": []}
      ]
    }
  }]
}"#;
        let bank = parse_question_bank_str(json, BankFormat::Json).unwrap();
        let warnings = validate_question_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.message == "sub-question 1 has unsupported type: essay"));
        assert!(warnings
            .iter()
            .any(|w| w.message == "sub-question 2 nests a comprehension question"));
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("README.md"), "# notes").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("more.json"), VALID_JSON).unwrap();

        let banks = load_question_directory(dir.path()).unwrap();
        let ids: Vec<&str> = banks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["geography", "json-bank"]);
    }

    #[test]
    fn load_directory_requires_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_question_directory(file.path()).is_err());
    }
}
