//! Registry document models
//!
//! Serde shapes of the remote inputs: the MDN group table, the webref name
//! index, per-name parsed IDL documents and the events table. Unknown fields
//! are ignored; only what documentation needs is modelled.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A raw IDL text fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub fragment: String,
}

/// A mixin pulled in with `includes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedMixin {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub defined: Fragment,
}

/// The parent of an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inheritance {
    pub name: String,
    #[serde(default)]
    pub defined: Option<Fragment>,
}

/// What a registry name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Interface,
    #[serde(rename = "interface mixin")]
    InterfaceMixin,
    #[serde(rename = "callback interface")]
    CallbackInterface,
    Namespace,
    Dictionary,
    Enum,
    Typedef,
    Callback,
    #[default]
    #[serde(other)]
    Other,
}

/// Per-name parsed IDL document (`idlnamesparsed/<name>.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub defined: Fragment,
    #[serde(default)]
    pub extended: Vec<Fragment>,
    #[serde(default)]
    pub includes: Vec<IncludedMixin>,
    #[serde(default)]
    pub inheritance: Option<Inheritance>,
}

impl IdlDocument {
    /// Own fragment, partial extensions and included mixins as one source.
    ///
    /// The own fragment comes first so the main definition parses at index 0.
    pub fn combined_source(&self) -> String {
        let mut parts: Vec<&str> = vec![self.defined.fragment.as_str()];
        parts.extend(self.extended.iter().map(|e| e.fragment.as_str()));
        parts.extend(self.includes.iter().map(|i| i.defined.fragment.as_str()));
        parts.join("\n")
    }

    /// Parent's own fragment, when the document declares inheritance
    pub fn parent_source(&self) -> Option<(&str, &str)> {
        let parent = self.inheritance.as_ref()?;
        let fragment = parent.defined.as_ref().map(|d| d.fragment.as_str())?;
        Some((parent.name.as_str(), fragment))
    }
}

/// Entry in `idlnames.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlNameEntry {
    /// Location of the raw IDL fragment
    #[serde(default)]
    pub fragment: Option<String>,
    /// Location of the parsed IDL document
    #[serde(default)]
    pub parsed: Option<String>,
}

/// Index of every documentable IDL name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdlNames(pub IndexMap<String, IdlNameEntry>);

impl IdlNames {
    pub fn get(&self, name: &str) -> Option<&IdlNameEntry> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One API group in `GroupData.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// MDN API groups, keyed by group name in file order.
///
/// The file is a one-element array wrapping the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GroupDataFile", into = "GroupDataFile")]
pub struct GroupData(pub IndexMap<String, GroupEntry>);

#[derive(Serialize, Deserialize)]
struct GroupDataFile(Vec<IndexMap<String, GroupEntry>>);

impl From<GroupDataFile> for GroupData {
    fn from(file: GroupDataFile) -> Self {
        GroupData(file.0.into_iter().next().unwrap_or_default())
    }
}

impl From<GroupData> for GroupDataFile {
    fn from(data: GroupData) -> Self {
        GroupDataFile(vec![data.0])
    }
}

impl GroupData {
    /// First group listing `interface`
    pub fn group_for(&self, interface: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, group)| group.interfaces.iter().any(|i| i == interface))
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Target of an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    pub target: String,
}

/// Entry in `events.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub targets: Vec<EventTarget>,
}

/// The events table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTable(pub Vec<EventEntry>);

impl EventTable {
    /// Event of type `event_type` fired at `target`
    pub fn find(&self, event_type: &str, target: &str) -> Option<&EventEntry> {
        self.0
            .iter()
            .find(|e| e.event_type == event_type && e.targets.iter().any(|t| t.target == target))
    }
}
