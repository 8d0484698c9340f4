//! Extraction of structured answers from model output.
//!
//! Models wrap JSON in markdown fences, add prose around it, or ignore the
//! requested format and answer with a bulleted list. These helpers accept all
//! of those shapes.

use serde_json::Value;

use crate::models::Category;

/// Pull a JSON value out of model output.
///
/// Looks inside a ```` ```json ```` or plain ```` ``` ```` fence first, then
/// tries the whole text, then the span between the first opening and last
/// closing bracket.
pub fn extract_json(text: &str) -> Option<Value> {
    let body = fenced_body(text).unwrap_or(text).trim();
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }

    let start = body.find(['{', '['])?;
    let end = body.rfind(['}', ']'])?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&body[start..=end]).ok()
}

fn fenced_body(text: &str) -> Option<&str> {
    let (_, rest) = text
        .split_once("```json")
        .or_else(|| text.split_once("```"))?;
    Some(rest.split("```").next().unwrap_or(rest))
}

/// Parse a list of cause labels for one category.
///
/// Accepts `{"causes": [...]}`, `{"causes": {"<Category>": [...]}}`,
/// `{"<Category>": [...]}`, a bare array of strings, or bulleted/numbered
/// lines. Bracketed text that is not a list of labels, such as a `[1]`
/// citation inside a bullet, falls through to line parsing.
/// Labels are trimmed, empties dropped, and the list capped at `limit`.
pub fn parse_cause_list(text: &str, category: Category, limit: usize) -> Vec<String> {
    let items = extract_json(text)
        .and_then(|value| list_from_json(&value, category))
        .unwrap_or_else(|| list_from_lines(text));

    items
        .iter()
        .map(|s| clean_label(s))
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect()
}

/// `None` when the value is not shaped like a cause list.
fn list_from_json(value: &Value, category: Category) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(String::from))
            .collect(),
        Value::Object(map) => {
            let inner = map.get("causes").or_else(|| {
                map.iter()
                    .find(|(key, _)| Category::from_str(key) == Some(category))
                    .map(|(_, inner)| inner)
            });
            Some(
                inner
                    .and_then(|inner| list_from_json(inner, category))
                    .unwrap_or_default(),
            )
        }
        _ => None,
    }
}

fn list_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(String::from)
        .collect()
}

/// Parse a single why-answer.
///
/// Accepts a JSON string, an object with a `reason`/`answer`/`why`/`cause`
/// field, a one-element array, or plain text (first non-empty line).
pub fn parse_why_answer(text: &str) -> String {
    let from_json = extract_json(text).and_then(|value| match value {
        Value::String(s) => Some(s),
        Value::Array(items) => items.first().and_then(Value::as_str).map(String::from),
        Value::Object(map) => ["reason", "answer", "why", "cause"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(String::from),
        _ => None,
    });

    let raw = match from_json {
        Some(s) => s,
        None => text
            .lines()
            .map(strip_bullet)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string(),
    };

    clean_label(&raw)
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(['-', '*', '•']).trim_start();

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }
    line
}

fn clean_label(s: &str) -> String {
    s.trim()
        .trim_matches(['"', '\'', '`'])
        .trim_end_matches('.')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_json_fence() {
        let text = "Here you go:\n```json\n{\"causes\": [\"a\"]}\n```\nThanks";
        assert_eq!(
            extract_json(text),
            Some(serde_json::json!({"causes": ["a"]}))
        );
    }

    #[test]
    fn test_extract_json_from_plain_fence() {
        let text = "```\n[\"x\", \"y\"]\n```";
        assert_eq!(extract_json(text), Some(serde_json::json!(["x", "y"])));
    }

    #[test]
    fn test_extract_json_from_surrounding_prose() {
        let text = "Sure! {\"reason\": \"Worn seals\"} Hope that helps.";
        assert_eq!(
            extract_json(text),
            Some(serde_json::json!({"reason": "Worn seals"}))
        );
    }

    #[test]
    fn test_extract_json_none_for_prose() {
        assert_eq!(extract_json("Just some words"), None);
    }

    #[test]
    fn test_cause_list_shapes() {
        let c = Category::Machine;
        assert_eq!(
            parse_cause_list(r#"{"causes": ["Server overload", " Disk full "]}"#, c, 5),
            vec!["Server overload", "Disk full"]
        );
        assert_eq!(
            parse_cause_list(r#"{"causes": {"Machine": ["Server overload"]}}"#, c, 5),
            vec!["Server overload"]
        );
        assert_eq!(
            parse_cause_list(r#"{"Machine": ["Server overload"], "Method": ["x"]}"#, c, 5),
            vec!["Server overload"]
        );
        assert_eq!(
            parse_cause_list(r#"["Server overload", ""]"#, c, 5),
            vec!["Server overload"]
        );
    }

    #[test]
    fn test_cause_list_from_bullets() {
        let text = "Machine causes:\n1. Server overload\n2) Slow disks.\n- Old CPU";
        assert_eq!(
            parse_cause_list(text, Category::Machine, 5),
            vec!["Server overload", "Slow disks", "Old CPU"]
        );
    }

    #[test]
    fn test_cause_list_bullets_with_citation_brackets() {
        let text = "- Slow DNS resolution\n- Missing CDN [1]";
        assert_eq!(
            parse_cause_list(text, Category::Machine, 3),
            vec!["Slow DNS resolution", "Missing CDN [1]"]
        );
    }

    #[test]
    fn test_cause_list_empty_json_stays_empty() {
        assert!(parse_cause_list(r#"{"causes": []}"#, Category::Machine, 3).is_empty());
        assert!(parse_cause_list("[]", Category::Machine, 3).is_empty());
    }

    #[test]
    fn test_cause_list_is_capped() {
        let text = r#"["a", "b", "c", "d"]"#;
        assert_eq!(parse_cause_list(text, Category::Man, 3), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cause_list_other_category_is_empty() {
        let text = r#"{"Method": ["Manual deploys"]}"#;
        assert!(parse_cause_list(text, Category::Machine, 3).is_empty());
    }

    #[test]
    fn test_why_answer_shapes() {
        assert_eq!(parse_why_answer("High traffic volume"), "High traffic volume");
        assert_eq!(parse_why_answer("\n- \"High traffic volume.\"\n"), "High traffic volume");
        assert_eq!(parse_why_answer(r#"{"reason": "No load balancing"}"#), "No load balancing");
        assert_eq!(parse_why_answer(r#""Insufficient capacity""#), "Insufficient capacity");
        assert_eq!(parse_why_answer("   "), "");
    }
}
