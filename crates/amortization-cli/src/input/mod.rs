pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use std::path::Path;

/// Resolve structured input: `--input <file>` first, then piped stdin.
/// Returns `None` when neither is present and the caller should fall back to flags.
pub fn read_structured<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::debug!("reading input from {path}");
            file::read_json(Path::new(path)).map(Some)
        }
        None => {
            let parsed = stdin::read_piped()?;
            if parsed.is_some() {
                log::debug!("read input from stdin");
            }
            Ok(parsed)
        }
    }
}
