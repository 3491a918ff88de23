use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a loan description piped on stdin.
///
/// `None` when stdin is a terminal or only carries whitespace, so the caller
/// can fall back to flags.
pub fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().lock().read_to_string(&mut piped)?;
    if piped.trim().is_empty() {
        return Ok(None);
    }

    let parsed =
        serde_json::from_str(&piped).map_err(|e| format!("Failed to parse stdin: {e}"))?;
    Ok(Some(parsed))
}
