use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Deserialize a JSON loan description from `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    if !path.is_file() {
        let problem = if path.exists() { "Not a file" } else { "File not found" };
        return Err(format!("{problem}: {}", path.display()).into());
    }

    let file =
        File::open(path).map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
    let parsed = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse '{}': {e}", path.display()))?;
    Ok(parsed)
}
