//! Example prompt listing

use std::fmt::Write;

use crate::core::prompts::PromptCatalog;

pub fn list_prompts() {
    print!("{}", format_prompt_list(&PromptCatalog::builtin()));
}

pub fn format_prompt_list(prompts: &PromptCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "💬 Example Prompts");
    let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let _ = writeln!(out);
    for (index, prompt) in prompts.prompts().iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {prompt}", index + 1);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "💡 Press Ctrl+P in the chat to type one of these for you");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_are_numbered_in_order() {
        let catalog =
            PromptCatalog::new(vec!["First idea".into(), "Second idea".into()]).expect("catalog");
        let text = format_prompt_list(&catalog);
        let first = text.find("  1. First idea").expect("first");
        let second = text.find("  2. Second idea").expect("second");
        assert!(first < second);
    }

    #[test]
    fn builtin_prompts_are_all_listed() {
        let catalog = PromptCatalog::builtin();
        let text = format_prompt_list(&catalog);
        assert!(text.contains(&format!("{:>3}. ", catalog.len())));
    }
}
