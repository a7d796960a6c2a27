//! `{{ variable }}` placeholders inside prompt content.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"))
}

/// Distinct variable names in order of first appearance.
pub fn variables(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder().captures_iter(content) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitutes every placeholder; unknown variables render as an empty string.
pub fn render(content: &str, vars: &HashMap<String, String>) -> String {
    placeholder()
        .replace_all(content, |caps: &Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_are_deduplicated_in_order() {
        let content = "Dear {{ name }}, from {{company}}. Bye {{name}}.";
        assert_eq!(variables(content), vec!["name", "company"]);
        assert!(variables("no placeholders { here }").is_empty());
    }

    #[test]
    fn render_substitutes_and_blanks_missing() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ada".to_string());
        assert_eq!(
            render("Hi {{name}} at {{ company }}!", &vars),
            "Hi Ada at !"
        );
    }
}
