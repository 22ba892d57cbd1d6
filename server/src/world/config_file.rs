// tile_world/server/src/world/config_file.rs
use crate::core::error::{WorldError, WorldResult};
use std::path::Path;

/// One non-comment line of a config source, split into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

impl ConfigRecord {
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with(';') || line.starts_with('#') || line.starts_with("//")
}

/// Splits `text` into records of at least `min_columns` tokens. Tokens are
/// separated by whitespace or commas; blank lines and comments are skipped.
pub fn parse_records(text: &str, min_columns: usize, source: &str) -> WorldResult<Vec<ConfigRecord>> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        let fields: Vec<String> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();
        if fields.len() < min_columns {
            return Err(WorldError::ConfigError(format!(
                "{} line {}: expected {} columns, found {}",
                source,
                idx + 1,
                min_columns,
                fields.len()
            )));
        }
        records.push(ConfigRecord { line: idx + 1, fields });
    }
    Ok(records)
}

pub fn load_records(path: &Path, min_columns: usize) -> WorldResult<Vec<ConfigRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            WorldError::NotFound(format!("config file {}", path.display()))
        }
        _ => WorldError::IoError(e),
    })?;
    // Tolerate a UTF-8 byte order mark written by some editors.
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    parse_records(text, min_columns, &path.display().to_string())
}
