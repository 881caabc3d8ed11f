use std::collections::HashMap;

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '.' || c == '-'
}

/// Extracts every `key="value"` pair from one log line.
///
/// The simulator's log files are xml, but the records this pipeline needs are
/// one element per line, so a line scan for attribute pairs is enough and
/// keeps truncated files (simulator killed mid-write) readable up to the
/// point of truncation. A pair whose closing quote is missing is dropped.
pub fn parse_attributes(line: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut rest = line;
    while let Some(eq) = rest.find("=\"") {
        let key_rev: String = rest[..eq].chars().rev().take_while(|&c| is_key_char(c)).collect();
        let key: String = key_rev.chars().rev().collect();
        let value_start = &rest[eq + 2..];
        match value_start.find('"') {
            Some(end) => {
                if !key.is_empty() {
                    attrs.insert(key, value_start[..end].to_string());
                }
                rest = &value_start[end + 1..];
            }
            None => break,
        }
    }
    attrs
}

/// Reads an attribute as f64. A missing or malformed value reads as 0.0 so
/// partial simulator output degrades to a zero contribution instead of
/// aborting the evaluation.
pub fn attr_f64(attrs: &HashMap<String, String>, key: &str) -> f64 {
    attrs.get(key).and_then(|v| v.parse().ok()).unwrap_or(0.0)
}
