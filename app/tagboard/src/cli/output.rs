//! CLI output formatting utilities.
//!
//! Colored JSON for `--json` output, plus small helpers for table cells and
//! progress lines.

use colored::Colorize;

/// Prints a serializable value as pretty, syntax-highlighted JSON.
///
/// Colors: keys cyan, strings green, numbers yellow, booleans and null
/// magenta, brackets bold white.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json));
}

/// Returns `json` with ANSI colors applied.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut token = String::new();
    let mut in_string = false;
    let mut escape_next = false;
    let mut is_key = false;
    let mut after_colon = false;

    for ch in json.chars() {
        if in_string {
            token.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                let colored =
                    if is_key { token.as_str().cyan() } else { token.as_str().green() };
                out.push_str(&colored.to_string());
                token.clear();
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                flush_scalar(&mut out, &mut token, after_colon);
                token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' => {
                flush_scalar(&mut out, &mut token, false);
                out.push(':');
                after_colon = true;
            }
            ',' => {
                flush_scalar(&mut out, &mut token, true);
                out.push(',');
                after_colon = false;
            }
            '{' | '}' | '[' | ']' => {
                flush_scalar(&mut out, &mut token, true);
                out.push_str(&ch.to_string().white().bold().to_string());
                after_colon = false;
            }
            _ => token.push(ch),
        }
    }

    flush_scalar(&mut out, &mut token, true);
    out
}

/// Writes a pending non-string token, coloring numbers and literals.
fn flush_scalar(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    let value = token.trim();
    if !is_value || value.is_empty() {
        out.push_str(token);
    } else {
        let start = token.len() - token.trim_start().len();
        let end = start + value.len();
        let colored = if matches!(value, "true" | "false" | "null") {
            value.magenta().to_string()
        } else if value.parse::<f64>().is_ok() {
            value.yellow().to_string()
        } else {
            value.to_string()
        };
        out.push_str(&token[..start]);
        out.push_str(&colored);
        out.push_str(&token[end..]);
    }

    token.clear();
}

/// Truncates a string to a maximum number of characters, adding an ellipsis.
///
/// Counts characters, not bytes.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".to_string();
    }

    let cut = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
    format!("{}…", &s[..cut])
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

/// Renders a fixed-width text progress bar, e.g. `[#####-----]  50%`.
#[must_use]
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = width * usize::from(percent) / 100;
    format!("[{}{}] {percent:>3}%", "#".repeat(filled), "-".repeat(width - filled))
}
