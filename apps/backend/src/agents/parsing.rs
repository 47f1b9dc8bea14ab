//! Helpers for turning LLM text into structured data.
//!
//! Field accessors are tolerant: a missing or mistyped value falls back to
//! the supplied default so one sloppy key does not sink a whole analysis.

use serde_json::Value;

use super::error::AgentError;

/// Parse a JSON object out of an LLM reply, stripping markdown fences.
pub fn parse_json_response(response: &str) -> Result<Value, AgentError> {
    let body = if let Some((_, rest)) = response.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if response.contains("```") {
        response.split("```").nth(1).unwrap_or(response)
    } else {
        response
    };

    serde_json::from_str(body.trim()).map_err(|e| AgentError::InvalidResponse(e.to_string()))
}

/// Lines that start with a digit or bullet, with the marker removed.
pub fn extract_reasoning_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            line.chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '•' | '*'))
        })
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_ascii_digit() || ".-•* ".contains(c))
                .trim()
                .to_string()
        })
        .filter(|step| !step.is_empty())
        .collect()
}

pub fn at<'a>(value: &'a Value, path: &[&str]) -> &'a Value {
    path.iter().fold(value, |v, key| &v[*key])
}

/// String at `path`; numbers are rendered, anything else yields `default`.
pub fn str_at(value: &Value, path: &[&str], default: &str) -> String {
    match at(value, path) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Number at `path`; numeric strings are accepted.
pub fn num_at(value: &Value, path: &[&str], default: f64) -> f64 {
    match at(value, path) {
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(default),
        _ => default,
    }
}

pub fn len_at(value: &Value, path: &[&str]) -> usize {
    at(value, path).as_array().map_or(0, Vec::len)
}

/// First `n` string items of the array at `path`.
pub fn strings_at(value: &Value, path: &[&str], n: usize) -> Vec<String> {
    at(value, path)
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .take(n)
                .collect()
        })
        .unwrap_or_default()
}

pub fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("• {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn group_digits(int_part: &str) -> String {
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    grouped
}

/// `1234567.5` -> `"1,234,567.50"`
pub fn money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{}.{frac}", group_digits(int_part))
}

/// `2500000` -> `"2,500,000"`
pub fn grouped(n: i64) -> String {
    let sign = if n < 0 { "-" } else { "" };
    format!("{sign}{}", group_digits(&n.unsigned_abs().to_string()))
}

pub fn score_of(value: &Value, path: &[&str]) -> String {
    let n = num_at(value, path, 0.0);
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_fenced_json() {
        let v = parse_json_response("Here you go:\n```json\n{\"a\": 1}\n```\nthanks").unwrap();
        assert_eq!(v["a"], 1);

        let v = parse_json_response("```\n{\"b\": 2}\n```").unwrap();
        assert_eq!(v["b"], 2);

        let v = parse_json_response("  {\"c\": 3} ").unwrap();
        assert_eq!(v["c"], 3);
    }

    #[test]
    fn invalid_json_is_invalid_response() {
        assert!(matches!(
            parse_json_response("not json at all"),
            Err(AgentError::InvalidResponse(_))
        ));
    }

    #[test]
    fn reasoning_steps_strip_markers() {
        let text = "Intro line\n1. Size the market\n- Rank cities\n• Price it\n* Ship it\n   \n42\n";
        assert_eq!(
            extract_reasoning_steps(text),
            vec!["Size the market", "Rank cities", "Price it", "Ship it"]
        );
    }

    #[test]
    fn tolerant_accessors_fall_back() {
        let v = json!({"a": {"b": "7.5", "c": 3, "list": ["x", 1, "y"]}});
        assert_eq!(num_at(&v, &["a", "b"], 0.0), 7.5);
        assert_eq!(num_at(&v, &["a", "missing"], 50.0), 50.0);
        assert_eq!(str_at(&v, &["a", "c"], "n/a"), "3");
        assert_eq!(str_at(&v, &["nope"], "n/a"), "n/a");
        assert_eq!(strings_at(&v, &["a", "list"], 5), vec!["x", "y"]);
        assert_eq!(len_at(&v, &["a", "list"]), 3);
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(1_234_567.5), "1,234,567.50");
        assert_eq!(money(999.0), "999.00");
        assert_eq!(money(0.0), "0.00");
        assert_eq!(grouped(2_500_000), "2,500,000");
        assert_eq!(grouped(950), "950");
    }
}
