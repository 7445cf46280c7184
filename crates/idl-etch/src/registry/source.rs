//! Schema sources
//!
//! Where registry documents come from: HTTP, a local mirror directory, or
//! an in-memory map for tests.

use crate::diagnostics::{EtchError, EtchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fetches raw document text by location
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch the document at `location`. `name` identifies the document in
    /// errors.
    async fn fetch_text(&self, name: &str, location: &str) -> EtchResult<String>;
}

/// HTTP source backed by a shared `reqwest` client
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source with the given user agent
    pub fn new(user_agent: &str) -> EtchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| EtchError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchemaSource for HttpSource {
    async fn fetch_text(&self, name: &str, location: &str) -> EtchResult<String> {
        debug!("Fetching {} from {}", name, location);
        let response = self
            .client
            .get(location)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| EtchError::fetch(name, location, e))?;
        response
            .text()
            .await
            .map_err(|e| EtchError::fetch(name, location, e))
    }
}

/// Local mirror of the registry.
///
/// A location is mapped onto the mirror by trying successively shorter
/// suffixes of its path, so `https://host/webref/ed/idlnamesparsed/Node.json`
/// finds `<root>/idlnamesparsed/Node.json` or `<root>/Node.json`.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate paths for a location, longest suffix first
    pub fn candidates(&self, location: &str) -> Vec<PathBuf> {
        let path = match location.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or_default(),
            None => location,
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        (0..segments.len())
            .map(|start| {
                segments[start..]
                    .iter()
                    .fold(self.root.clone(), |acc, seg| acc.join(seg))
            })
            .collect()
    }
}

#[async_trait]
impl SchemaSource for DirectorySource {
    async fn fetch_text(&self, name: &str, location: &str) -> EtchResult<String> {
        for candidate in self.candidates(location) {
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                debug!("Reading {} from {}", name, candidate.display());
                return tokio::fs::read_to_string(&candidate)
                    .await
                    .map_err(|e| EtchError::fetch(name, candidate.display().to_string(), e));
            }
        }
        Err(EtchError::fetch(
            name,
            location,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("not found under {}", self.root.display()),
            ),
        ))
    }
}

/// In-memory source keyed by location suffix
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document. A location matches when it ends with `key`.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(key.into(), text.into());
    }

    /// Builder-style [`MemorySource::insert`]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    fn lookup(&self, location: &str) -> Option<&String> {
        self.documents.get(location).or_else(|| {
            self.documents
                .iter()
                .filter(|(key, _)| location.ends_with(&format!("/{key}")))
                .max_by_key(|(key, _)| key.len())
                .map(|(_, text)| text)
        })
    }
}

#[async_trait]
impl SchemaSource for MemorySource {
    async fn fetch_text(&self, name: &str, location: &str) -> EtchResult<String> {
        self.lookup(location).cloned().ok_or_else(|| {
            EtchError::fetch(
                name,
                location,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_candidates() {
        let source = DirectorySource::new("/mirror");
        let candidates = source.candidates("https://w3c.github.io/webref/ed/idlnamesparsed/Node.json");
        assert_eq!(candidates.first(), Some(&PathBuf::from("/mirror/webref/ed/idlnamesparsed/Node.json")));
        assert_eq!(candidates.last(), Some(&PathBuf::from("/mirror/Node.json")));
        assert_eq!(
            source.candidates("events.json"),
            vec![PathBuf::from("/mirror/events.json")]
        );
    }

    #[tokio::test]
    async fn test_directory_source_reads_mirror() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("idlnamesparsed")).unwrap();
        std::fs::write(dir.path().join("idlnamesparsed/Node.json"), "{}").unwrap();

        let source = DirectorySource::new(dir.path());
        let text = source
            .fetch_text("Node", "https://w3c.github.io/webref/ed/idlnamesparsed/Node.json")
            .await
            .unwrap();
        assert_eq!(text, "{}");

        let err = source
            .fetch_text("Missing", "https://w3c.github.io/webref/ed/idlnamesparsed/Missing.json")
            .await
            .unwrap_err();
        assert!(matches!(err, EtchError::SchemaFetch { .. }));
    }

    #[tokio::test]
    async fn test_memory_source_suffix_match() {
        let source = MemorySource::new().with("idlnamesparsed/Node.json", "{\"type\":\"interface\"}");
        let text = source
            .fetch_text("Node", "https://example.com/ed/idlnamesparsed/Node.json")
            .await
            .unwrap();
        assert!(text.contains("interface"));
        assert!(source.fetch_text("X", "https://example.com/X.json").await.is_err());
    }
}
