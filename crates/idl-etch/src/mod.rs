//! idl-etch: documentation skeleton generator for Web API interfaces
//!
//! This crate generates MDN-style Markdown pages for WebIDL interfaces by:
//! - Fetching parsed IDL documents, the group table and the events table
//!   from the webref/MDN registry (or a local mirror)
//! - Parsing own fragment, partials and mixins into one fragment set
//! - Extracting de-duplicated member categories with composable predicates
//! - Describing member types in prose, expanding dictionaries and enums
//! - Rendering page records with Handlebars templates
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐
//! │ idlnames /   │    │ events.json  │
//! │ GroupData    │    │              │
//! └──────┬───────┘    └──────┬───────┘
//!        └─────────┬─────────┘
//!                  ▼
//!          ┌───────────────┐
//!          │ SchemaRegistry│ ── IDL parser ──▶ IdlFragmentSet
//!          └───────┬───────┘
//!                  ▼
//!            ┌──────────┐      ┌───────────────┐
//!            │ Resolver │ ◀──▶ │ TypeFormatter │
//!            └────┬─────┘      └───────────────┘
//!                 ▼
//!          ┌───────────────┐
//!          │ PageGenerator │ ──▶ PageRenderer ──▶ Markdown
//!          └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use idl_etch::{EtchConfig, PageGenerator, PageRequest};
//!
//! # async fn run() -> idl_etch::EtchResult<()> {
//! let generator = PageGenerator::from_config(EtchConfig::default())?;
//! let page = generator
//!     .generate(&PageRequest::interface("Node").for_member("nodeName", false))
//!     .await?;
//! println!("{page}");
//! # Ok(())
//! # }
//! ```

// IDL front end
pub mod idl;

// Extraction
pub mod members;
pub mod predicates;

// Registry, resolution and formatting
pub mod config;
pub mod diagnostics;
pub mod format;
pub mod registry;
pub mod resolver;

// Output
pub mod pages;
pub mod render;


// Re-exports for convenience
pub use config::EtchConfig;
pub use diagnostics::{EtchError, EtchResult};
pub use format::{primitive_label, TypeDescription, TypeFormatter};
pub use idl::{parse_fragment_set, IdlFragmentSet, IdlType, Member, ParseError};
pub use members::{compare_names, extract, sort_by_name};
pub use pages::{
    write_pages, EventPage, GeneratedPage, InterfacePage, MemberPage, MemberSelector, PageData,
    PageGenerator, PageRequest,
};
pub use registry::{DirectorySource, HttpSource, MemorySource, SchemaRegistry, SchemaSource};
pub use render::PageRenderer;
pub use resolver::{InterfaceData, MemberIndex, Resolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
