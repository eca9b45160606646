//! The `quizgrade types` command.

use anyhow::Result;

use quizgrade_core::model::QuestionKind;
use quizgrade_core::registry::{self, Category};

fn parse_category(s: &str) -> Result<Category> {
    let category = match s {
        "basic" => Category::Basic,
        "open" => Category::Open,
        "interactive" => Category::Interactive,
        "visual" => Category::Visual,
        "complex" => Category::Complex,
        other => anyhow::bail!(
            "unknown category '{other}', expected basic, open, interactive, visual or complex"
        ),
    };
    Ok(category)
}

pub fn execute(category: Option<String>, template: Option<String>) -> Result<()> {
    if let Some(key) = template {
        let handler = registry::handler_for(&key)?;
        let template = serde_json::json!({
            "type": handler.kind(),
            "definition": handler.default_definition(),
            "answer_schema": handler.default_answer_schema(),
        });
        println!("{}", serde_json::to_string_pretty(&template)?);
        return Ok(());
    }

    let kinds: Vec<QuestionKind> = match category.as_deref() {
        Some(c) => registry::kinds_by_category(parse_category(c)?),
        None => registry::all_kinds().to_vec(),
    };

    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Type", "Name", "Category", "Grading", "Images"]);
    for kind in kinds {
        let info = registry::type_info(kind);
        table.add_row(vec![
            Cell::new(info.key),
            Cell::new(info.name),
            Cell::new(info.category),
            Cell::new(info.grading),
            Cell::new(if info.supports_images { "yes" } else { "no" }),
        ]);
    }
    println!("{table}");

    Ok(())
}
