//! Minimal CSV field encoding for the `--list` report.

/// Quote a field if it contains a comma, quote or newline. Embedded quotes are doubled.
pub fn escape_field(input: &str) -> String {
    if !input.contains([',', '"', '\n']) {
        return input.to_string();
    }
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('"');
    for c in input.chars() {
        if c == '"' {
            escaped.push_str("\"\"");
        } else {
            escaped.push(c);
        }
    }
    escaped.push('"');
    escaped
}

/// Encode one record as a CSV line without the trailing newline.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
