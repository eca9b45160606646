//! The `quizgrade init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizgrade.toml").exists() {
        println!("quizgrade.toml already exists, skipping.");
    } else {
        std::fs::write("quizgrade.toml", SAMPLE_CONFIG)?;
        println!("Created quizgrade.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let bank_path = std::path::Path::new("question-banks/example.toml");
    if bank_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    let responses_path = std::path::Path::new("question-banks/example-responses.json");
    if responses_path.exists() {
        println!("question-banks/example-responses.json already exists, skipping.");
    } else {
        std::fs::write(responses_path, EXAMPLE_RESPONSES)?;
        println!("Created question-banks/example-responses.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizgrade validate --bank question-banks/example.toml");
    println!("  2. Run: quizgrade render --bank question-banks/example.toml --question capital");
    println!(
        "  3. Run: quizgrade grade --bank question-banks/example.toml --responses question-banks/example-responses.json"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgrade configuration

output_dir = "./quizgrade-results"
default_format = "json"
log_filter = "quizgrade=info"
fail_on_invalid = false
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "A small bank to get started"

[[questions]]
id = "capital"
title = "Capital of France"
type = "mcq"
marks = 1

[questions.definition]
question_text = "What is the capital of France?"
options = [
    { text = "London", is_correct = false },
    { text = "Paris", is_correct = true },
    { text = "Berlin", is_correct = false },
]

[[questions]]
id = "water-cycle"
title = "Water cycle"
type = "ordering"
marks = 2

[questions.definition]
question_text = "Arrange the stages of the water cycle."
items = ["Condensation", "Evaporation", "Precipitation"]
correct_order = ["Evaporation", "Condensation", "Precipitation"]

[[questions]]
id = "photosynthesis"
title = "Photosynthesis"
type = "cloze"
marks = 2

[questions.definition]
passage = "Plants absorb {gas} and release {product}."
blanks = [
    { id = "gas", correct_answers = ["carbon dioxide", "CO2"], accept_partial = true },
    { id = "product", correct_answers = ["oxygen"], accept_partial = true },
]
"#;

const EXAMPLE_RESPONSES: &str = r#"{
  "capital": {"selected_options": ["b"]},
  "water-cycle": {"order": ["Evaporation", "Condensation", "Precipitation"]},
  "photosynthesis": {"answers": {"gas": "carbon dioxide", "product": "oxygen"}}
}
"#;
