use crate::error::Error;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Whether the manual input names a remote document instead of a local file
pub fn is_share_link(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Pull the file id out of a Drive share link. Both common shapes are
/// handled: `…/file/d/<id>/view` and `…?id=<id>`.
pub fn extract_file_id(link: &str) -> Option<&str> {
    if let Some((_, rest)) = link.split_once("/file/d/") {
        let id = rest.split(['/', '?', '#']).next().unwrap_or("");
        if !id.is_empty() {
            return Some(id);
        }
    }
    for marker in ["?id=", "&id="] {
        if let Some((_, rest)) = link.split_once(marker) {
            let id = rest.split(['&', '#']).next().unwrap_or("");
            if !id.is_empty() {
                return Some(id);
            }
        }
    }
    None
}

fn read_token(path: &Path) -> Result<String, Error> {
    let token = std::fs::read_to_string(path)
        .map_err(|e| Error::Resource(format!("credentials {}: {e}", path.display())))?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(Error::Resource(format!(
            "credentials {} holds no token",
            path.display()
        )));
    }
    Ok(token)
}

/// Download a shared document and return its raw bytes. The credentials file
/// holds a bearer token; producing one is left to external tooling.
pub fn fetch_document(link: &str, credentials: Option<&Path>) -> Result<Vec<u8>, Error> {
    let id = extract_file_id(link)
        .ok_or_else(|| Error::Usage(format!("cannot find a file id in share link {link}")))?;
    let credentials = credentials.ok_or_else(|| {
        Error::Usage("a share link needs --credentials pointing at a bearer token file".into())
    })?;
    let token = read_token(credentials)?;

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(10))
        .timeout_read(Duration::from_secs(60))
        .build();
    let url = format!("https://www.googleapis.com/drive/v3/files/{id}?alt=media");
    tracing::info!(id, "downloading document");

    let response = agent
        .get(&url)
        .set("Authorization", &format!("Bearer {token}"))
        .call()
        .map_err(|e| Error::RemoteFetch(e.to_string()))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| Error::RemoteFetch(format!("reading response body: {e}")))?;
    tracing::debug!(bytes = bytes.len(), "document downloaded");
    Ok(bytes)
}
