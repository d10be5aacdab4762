//! JSON command input: the file named by `--input`, else JSON piped on stdin.

use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Typed input for a command, or `None` when neither a file nor piped JSON
/// is present so the caller can fall back to individual flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => read_file(Path::new(path)).map(Some),
        None => read_piped(),
    }
}

/// Deserialize a JSON file straight into `T`.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    log::debug!("reading JSON input from {}", path.display());
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    parse(&contents, &path.display().to_string())
}

fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    log::debug!("reading JSON input from stdin ({} bytes)", buffer.len());
    parse(&buffer, "stdin").map(Some)
}

fn parse<T: DeserializeOwned>(text: &str, source: &str) -> Result<T, Box<dyn std::error::Error>> {
    serde_json::from_str(text).map_err(|e| format!("Failed to parse {}: {}", source, e).into())
}
