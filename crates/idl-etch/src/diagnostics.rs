//! Error types
//!
//! This module provides the error type shared by the registry, resolver
//! and page generators.

use crate::idl::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for idl-etch operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Boxed source error for fetch failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for idl-etch
#[derive(Debug, Error)]
pub enum EtchError {
    /// Network or read failure retrieving a schema document
    #[error("Failed to fetch data for {name} from {location}: {source}")]
    SchemaFetch {
        name: String,
        location: String,
        #[source]
        source: BoxError,
    },

    /// Schema document is not the expected JSON shape
    #[error("Failed to parse data for {name} from {location}: {source}")]
    SchemaParse {
        name: String,
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// IDL fragment text does not parse
    #[error("Failed to parse IDL for {name}: {source}")]
    IdlParse {
        name: String,
        #[source]
        source: ParseError,
    },

    /// Schema parsed but has no interface-like main definition
    #[error("{name} is not a documentable interface")]
    NotAnInterface { name: String },

    /// Requested member does not exist on the interface
    #[error("Unknown {interface}.{member}")]
    UnknownMember { interface: String, member: String },

    /// Requested event has no handler attribute on the interface
    #[error("Unknown event {event} for {interface}")]
    UnknownEvent { interface: String, event: String },

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EtchError {
    /// Create a fetch error
    pub fn fetch(
        name: impl Into<String>,
        location: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        EtchError::SchemaFetch {
            name: name.into(),
            location: location.into(),
            source: source.into(),
        }
    }

    /// Create an unknown member error
    pub fn unknown_member(interface: impl Into<String>, member: impl Into<String>) -> Self {
        EtchError::UnknownMember {
            interface: interface.into(),
            member: member.into(),
        }
    }

    /// Create an unknown event error
    pub fn unknown_event(interface: impl Into<String>, event: impl Into<String>) -> Self {
        EtchError::UnknownEvent {
            interface: interface.into(),
            event: event.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EtchError::Config(message.into())
    }

    /// Name of the schema document involved, if any
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            EtchError::SchemaFetch { name, .. }
            | EtchError::SchemaParse { name, .. }
            | EtchError::IdlParse { name, .. }
            | EtchError::NotAnInterface { name } => Some(name),
            _ => None,
        }
    }
}

impl From<handlebars::RenderError> for EtchError {
    fn from(e: handlebars::RenderError) -> Self {
        EtchError::Template(e.to_string())
    }
}

impl From<handlebars::TemplateError> for EtchError {
    fn from(e: handlebars::TemplateError) -> Self {
        EtchError::Template(e.to_string())
    }
}

impl From<toml::de::Error> for EtchError {
    fn from(e: toml::de::Error) -> Self {
        EtchError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_member_message() {
        let err = EtchError::unknown_member("Node", "constructor");
        assert_eq!(err.to_string(), "Unknown Node.constructor");
    }

    #[test]
    fn test_unknown_event_message() {
        let err = EtchError::unknown_event("HTMLElement", "frobnicate");
        assert_eq!(err.to_string(), "Unknown event frobnicate for HTMLElement");
    }

    #[test]
    fn test_fetch_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = EtchError::fetch("Node", "idlnamesparsed/Node.json", io);
        assert!(err.to_string().contains("Node"));
        assert!(err.to_string().contains("gone"));
        assert_eq!(err.schema_name(), Some("Node"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_idl_parse_error() {
        let err = EtchError::IdlParse {
            name: "Foo".into(),
            source: ParseError::new("expected `;`", 3, 7),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse IDL for Foo: expected `;` at 3:7"
        );
    }
}
