use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::CliError;

pub fn append_line(path: &Path, line: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

pub fn clipped_input(input: &str, total_width: usize, prefix_len: usize) -> (String, u16) {
    let max_len = total_width.saturating_sub(prefix_len + 1);
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= max_len {
        (input.to_string(), chars.len() as u16)
    } else {
        let visible: String = chars[chars.len() - max_len..].iter().collect();
        (visible, max_len as u16)
    }
}

/// Parse a 1-based position typed by the user into an index.
pub fn parse_position(value: Option<&str>, what: &str) -> Result<usize, CliError> {
    let value = value.ok_or_else(|| CliError::InvalidConfig(format!("missing {what} number")))?;
    match value.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position - 1),
        _ => Err(CliError::InvalidConfig(format!(
            "{what} number must be 1 or more, got {value:?}"
        ))),
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}
