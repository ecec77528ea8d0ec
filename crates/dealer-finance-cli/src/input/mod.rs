pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve a request body: an `--input` file wins, then piped stdin.
/// `None` means the caller should build the request from flags.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    stdin::read_stdin()
}
