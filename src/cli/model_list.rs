//! Model listing functionality
//!
//! Prints the built-in catalog grouped by category, marking the configured
//! default model.

use std::fmt::Write;

use crate::core::catalog::{ModelCatalog, ModelCategory};
use crate::core::config::Config;

pub fn list_models(catalog: &ModelCatalog, config: &Config) {
    print!("{}", format_model_list(catalog, config.default_model.as_deref()));
}

pub fn format_model_list(catalog: &ModelCatalog, default_model: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🤖 Available Models");
    let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let _ = writeln!(out);

    if let Some(default_model) = default_model {
        if catalog.find(default_model).is_some() {
            let _ = writeln!(out, "🎯 Default model: {default_model} (from config)");
        } else {
            let _ = writeln!(
                out,
                "⚠️  Configured default model '{default_model}' is not in the catalog"
            );
        }
        let _ = writeln!(out);
    }

    for (category, heading) in [
        (ModelCategory::Free, "Free models"),
        (ModelCategory::Premium, "Premium models"),
    ] {
        let mut models = catalog.by_category(category).peekable();
        if models.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "{heading}:");
        for model in models {
            let marker = if default_model == Some(model.id.as_str()) {
                " (default)"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  • {} [{}]{marker}",
                model.id,
                category.badge()
            );
            let _ = writeln!(out, "    {} · {}", model.name, model.provider);
            if !model.description.is_empty() {
                let _ = writeln!(out, "    {}", model.description);
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "💡 Start a chat with: parley --model <id>");
    let _ = writeln!(out, "💡 Save a default with: parley set default-model <id>");
    out
}
