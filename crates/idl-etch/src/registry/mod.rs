//! Schema registry
//!
//! Fetches and caches the registry tables and per-name IDL documents, and
//! turns documents into parsed fragment sets.

mod cache;
pub mod schema;
pub mod source;

pub use cache::SchemaCache;
pub use schema::{
    DocumentKind, EventEntry, EventTable, GroupData, GroupEntry, IdlDocument, IdlNameEntry,
    IdlNames, Inheritance,
};
pub use source::{DirectorySource, HttpSource, MemorySource, SchemaSource};

use crate::config::EtchConfig;
use crate::diagnostics::{EtchError, EtchResult};
use crate::idl::{parse_fragment_set, IdlFragmentSet};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// The three registry-wide tables
#[derive(Debug, Clone, Default)]
pub struct RegistryTables {
    pub group_data: GroupData,
    pub idl_names: IdlNames,
    pub events: EventTable,
}

/// Registry access for one application instance
pub struct SchemaRegistry {
    source: Arc<dyn SchemaSource>,
    config: EtchConfig,
    documents: SchemaCache<IdlDocument>,
    tables: OnceCell<Arc<RegistryTables>>,
}

impl SchemaRegistry {
    /// Create a registry over `source`
    pub fn new(source: Arc<dyn SchemaSource>, config: EtchConfig) -> Self {
        Self {
            source,
            config,
            documents: SchemaCache::new(),
            tables: OnceCell::new(),
        }
    }

    /// Create a registry with the source the config asks for: the mirror
    /// directory when set, HTTP otherwise.
    pub fn from_config(config: EtchConfig) -> EtchResult<Self> {
        let source: Arc<dyn SchemaSource> = match &config.mirror_dir {
            Some(dir) => Arc::new(DirectorySource::new(dir.clone())),
            None => Arc::new(HttpSource::new(&config.user_agent)?),
        };
        Ok(Self::new(source, config))
    }

    pub fn config(&self) -> &EtchConfig {
        &self.config
    }

    async fn fetch_json<T: DeserializeOwned>(&self, name: &str, location: &str) -> EtchResult<T> {
        let text = self.source.fetch_text(name, location).await?;
        serde_json::from_str(&text).map_err(|source| EtchError::SchemaParse {
            name: name.to_string(),
            location: location.to_string(),
            source,
        })
    }

    /// Group table, name index and events table, fetched concurrently on
    /// first use.
    pub async fn tables(&self) -> EtchResult<Arc<RegistryTables>> {
        let tables = self
            .tables
            .get_or_try_init(|| async {
                let (group_data, idl_names, events) = tokio::try_join!(
                    self.fetch_json::<GroupData>("GroupData", &self.config.group_data_url),
                    self.fetch_json::<IdlNames>("idlnames", &self.config.idl_names_url),
                    self.fetch_json::<EventTable>("events", &self.config.events_url),
                )?;
                info!(
                    "Loaded registry: {} groups, {} IDL names, {} events",
                    group_data.0.len(),
                    idl_names.0.len(),
                    events.0.len()
                );
                Ok::<_, EtchError>(Arc::new(RegistryTables {
                    group_data,
                    idl_names,
                    events,
                }))
            })
            .await?;
        Ok(tables.clone())
    }

    /// Location of the parsed document for `name`: the `parsed` entry of
    /// the name index, else the conventional path under `idl_parsed_base`.
    pub async fn idl_location(&self, name: &str) -> EtchResult<String> {
        let tables = self.tables().await?;
        Ok(tables
            .idl_names
            .get(name)
            .and_then(|entry| entry.parsed.as_deref())
            .map(|parsed| self.config.resolve_location(parsed))
            .unwrap_or_else(|| self.config.default_idl_location(name)))
    }

    /// Parsed IDL document for `name`, cached for the registry's lifetime
    pub async fn idl(&self, name: &str) -> EtchResult<Arc<IdlDocument>> {
        if let Some(doc) = self.documents.get(name) {
            debug!("Cache hit for {}", name);
            return Ok(doc);
        }
        let location = self.idl_location(name).await?;
        self.documents
            .get_or_try_init(name, || self.fetch_json::<IdlDocument>(name, &location))
            .await
    }

    /// Own fragment, partials and mixins of `name`, parsed as one set
    pub async fn parsed_idl(&self, name: &str) -> EtchResult<(Arc<IdlDocument>, IdlFragmentSet)> {
        let doc = self.idl(name).await?;
        let set = parse_named(name, &doc.combined_source())?;
        Ok((doc, set))
    }

    /// Number of cached documents
    pub fn cached_documents(&self) -> usize {
        self.documents.len()
    }
}

/// Parse IDL text, attributing failures to `name`
pub fn parse_named(name: &str, source: &str) -> EtchResult<IdlFragmentSet> {
    parse_fragment_set(source).map_err(|source| EtchError::IdlParse {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::mock_registry;

    #[tokio::test]
    async fn test_tables_load() {
        let registry = mock_registry();
        let tables = registry.tables().await.unwrap();
        assert_eq!(tables.group_data.group_for("Node"), Some("DOM"));
        assert!(tables.idl_names.contains("Node"));
        assert!(tables.events.find("click", "Element").is_some());
    }

    #[tokio::test]
    async fn test_idl_is_cached() {
        let registry = mock_registry();
        assert_eq!(registry.cached_documents(), 0);
        let first = registry.idl("Node").await.unwrap();
        let second = registry.idl("Node").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.cached_documents(), 1);
    }

    #[tokio::test]
    async fn test_parsed_idl_main_first() {
        let registry = mock_registry();
        let (_, set) = registry.parsed_idl("Node").await.unwrap();
        assert_eq!(set.main().map(|d| d.name()), Some("Node"));
    }

    #[tokio::test]
    async fn test_missing_document_is_fetch_error() {
        let registry = mock_registry();
        let err = registry.idl("DoesNotExist").await.unwrap_err();
        assert!(matches!(err, EtchError::SchemaFetch { ref name, .. } if name == "DoesNotExist"));
        // Not cached negatively
        assert_eq!(registry.cached_documents(), 0);
    }

    #[tokio::test]
    async fn test_cold_registry_uses_indexed_location() {
        let source = MemorySource::new()
            .with("GroupData.json", "[{}]")
            .with("events.json", "[]")
            .with(
                "idlnames.json",
                r#"{ "Widget": { "fragment": "idl/Widget.idl", "parsed": "custom/Widget.json" } }"#,
            )
            .with(
                "custom/Widget.json",
                r#"{ "name": "Widget", "type": "interface",
                     "defined": { "fragment": "interface Widget {};" } }"#,
            );
        let registry = SchemaRegistry::new(Arc::new(source), EtchConfig::default());

        assert_eq!(
            registry.idl_location("Widget").await.unwrap(),
            "https://w3c.github.io/webref/ed/custom/Widget.json"
        );
        let doc = registry.idl("Widget").await.unwrap();
        assert_eq!(doc.name.as_deref(), Some("Widget"));

        let cold = SchemaRegistry::new(registry.source.clone(), EtchConfig::default());
        let (_, set) = cold.parsed_idl("Widget").await.unwrap();
        assert_eq!(set.main().map(|d| d.name()), Some("Widget"));
    }

    #[tokio::test]
    async fn test_unindexed_name_uses_default_location() {
        let registry = mock_registry();
        assert_eq!(
            registry.idl_location("Unlisted").await.unwrap(),
            "https://w3c.github.io/webref/ed/idlnamesparsed/Unlisted.json"
        );
    }

    #[tokio::test]
    async fn test_malformed_document_is_schema_parse_error() {
        let source = MemorySource::new()
            .with("GroupData.json", "[{}]")
            .with("events.json", "[]")
            .with("idlnames.json", "{}")
            .with("idlnamesparsed/Broken.json", "{ not json");
        let registry = SchemaRegistry::new(Arc::new(source), EtchConfig::default());
        let err = registry.idl("Broken").await.unwrap_err();
        assert!(matches!(
            err,
            EtchError::SchemaParse { ref name, ref location, .. }
                if name == "Broken" && location.ends_with("idlnamesparsed/Broken.json")
        ));
        assert_eq!(registry.cached_documents(), 0);
    }

    #[test]
    fn test_parse_named_attributes_error() {
        let err = parse_named("Broken", "interface {").unwrap_err();
        assert_eq!(err.schema_name(), Some("Broken"));
    }
}
