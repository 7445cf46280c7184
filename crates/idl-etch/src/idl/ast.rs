//! WebIDL syntax tree
//!
//! Definitions lowered from the `weedle2` syntax tree: top-level
//! definitions, interface members, arguments and type descriptors. Only
//! the parts needed for documentation are kept.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extended attribute, by name (`SecureContext`, `Exposed`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedAttribute {
    pub name: String,
}

impl ExtendedAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Generic type constructors
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenericKind {
    /// `sequence<T>`
    Sequence,
    /// `FrozenArray<T>`
    FrozenArray,
    /// `ObservableArray<T>`
    ObservableArray,
    /// Legacy `T[]` / `array<T>`
    Array,
    /// `record<K, V>`
    Record,
    /// `Promise<T>`
    Promise,
    /// Anything else written as `Name<T>`
    Other(String),
}

impl GenericKind {
    /// Tag as written in IDL source
    pub fn tag(&self) -> &str {
        match self {
            GenericKind::Sequence => "sequence",
            GenericKind::FrozenArray => "FrozenArray",
            GenericKind::ObservableArray => "ObservableArray",
            GenericKind::Array => "array",
            GenericKind::Record => "record",
            GenericKind::Promise => "Promise",
            GenericKind::Other(tag) => tag,
        }
    }

    /// Whether this generic denotes an ordered list of values
    pub fn is_array_like(&self) -> bool {
        matches!(
            self,
            GenericKind::Sequence
                | GenericKind::FrozenArray
                | GenericKind::ObservableArray
                | GenericKind::Array
        )
    }
}

/// A WebIDL type descriptor
///
/// Primitive and named types share the `Named` variant: whether a name is a
/// primitive is decided when the type is described, so unknown primitive
/// spellings fall through to registry resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdlType {
    /// Primitive or named reference (`unsigned long`, `DOMString`, `Node`)
    Named(String),

    /// Union type (`(A or B)`)
    Union(Vec<IdlType>),

    /// Generic type (`sequence<T>`, `record<K, V>`)
    Generic { kind: GenericKind, args: Vec<IdlType> },

    /// Nullable wrapper (`T?`)
    Nullable(Box<IdlType>),
}

impl IdlType {
    /// Create a named type
    pub fn named(name: impl Into<String>) -> Self {
        IdlType::Named(name.into())
    }

    /// Create a generic type
    pub fn generic(kind: GenericKind, args: Vec<IdlType>) -> Self {
        IdlType::Generic { kind, args }
    }

    /// Wrap in a nullable type
    pub fn nullable(self) -> Self {
        IdlType::Nullable(Box::new(self))
    }

    /// The name of a `Named` type, looking through nullable wrappers.
    pub fn named_type(&self) -> Option<&str> {
        match self {
            IdlType::Named(name) => Some(name),
            IdlType::Nullable(inner) => inner.named_type(),
            _ => None,
        }
    }

    /// Whether this is the `undefined` return sentinel
    pub fn is_undefined(&self) -> bool {
        matches!(self, IdlType::Named(name) if name == "undefined")
    }

    /// Render back to IDL syntax
    pub fn to_idl(&self) -> String {
        match self {
            IdlType::Named(name) => name.clone(),
            IdlType::Union(members) => {
                let parts: Vec<String> = members.iter().map(|t| t.to_idl()).collect();
                format!("({})", parts.join(" or "))
            }
            IdlType::Generic { kind, args } => {
                let parts: Vec<String> = args.iter().map(|t| t.to_idl()).collect();
                format!("{}<{}>", kind.tag(), parts.join(", "))
            }
            IdlType::Nullable(inner) => format!("{}?", inner.to_idl()),
        }
    }
}

impl fmt::Display for IdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_idl())
    }
}

/// Operation or constructor argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// Argument name
    pub name: String,

    /// Argument type
    pub idl_type: IdlType,

    /// Whether declared `optional`
    #[serde(default)]
    pub optional: bool,

    /// Whether variadic (`T... name`)
    #[serde(default)]
    pub variadic: bool,

    /// Extended attributes on the argument
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ext_attrs: Vec<ExtendedAttribute>,
}

impl Argument {
    /// Create a required argument
    pub fn new(name: impl Into<String>, idl_type: IdlType) -> Self {
        Self {
            name: name.into(),
            idl_type,
            optional: false,
            variadic: false,
            ext_attrs: vec![],
        }
    }
}

/// Member kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    /// `attribute`
    Attribute,
    /// Regular, special or static operation
    Operation,
    /// `constructor(...)`
    Constructor,
    /// `const`
    Const,
    /// `iterable`, `maplike`, `setlike` and async iterable declarations
    Declaration,
}

/// Member qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Special {
    #[default]
    None,
    Static,
    Getter,
    Setter,
    Deleter,
    Stringifier,
    Inherit,
}

/// A member of an interface-like definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member kind
    pub kind: MemberKind,

    /// Member name (absent for unnamed special operations)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    /// Qualifier
    #[serde(default)]
    pub special: Special,

    /// Whether declared `readonly`
    #[serde(default)]
    pub readonly: bool,

    /// Attribute/const type or operation return type
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub idl_type: Option<IdlType>,

    /// Extended attributes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ext_attrs: Vec<ExtendedAttribute>,

    /// Arguments (operations and constructors)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

impl Member {
    pub(crate) fn new(kind: MemberKind) -> Self {
        Self {
            kind,
            name: None,
            special: Special::None,
            readonly: false,
            idl_type: None,
            ext_attrs: vec![],
            arguments: vec![],
        }
    }

    /// Create an attribute
    pub fn attribute(name: impl Into<String>, idl_type: IdlType) -> Self {
        Self {
            name: Some(name.into()),
            idl_type: Some(idl_type),
            ..Self::new(MemberKind::Attribute)
        }
    }

    /// Create an operation
    pub fn operation(name: impl Into<String>, return_type: IdlType) -> Self {
        Self {
            name: Some(name.into()),
            idl_type: Some(return_type),
            ..Self::new(MemberKind::Operation)
        }
    }

    /// Create a constructor
    pub fn constructor() -> Self {
        Self::new(MemberKind::Constructor)
    }

    /// Create a constant
    pub fn constant(name: impl Into<String>, idl_type: IdlType) -> Self {
        Self {
            name: Some(name.into()),
            idl_type: Some(idl_type),
            readonly: true,
            ..Self::new(MemberKind::Const)
        }
    }

    /// Create an iterable/maplike/setlike declaration
    pub fn declaration(keyword: impl Into<String>) -> Self {
        Self {
            name: Some(keyword.into()),
            readonly: true,
            ..Self::new(MemberKind::Declaration)
        }
    }

    /// Set the qualifier
    pub fn with_special(mut self, special: Special) -> Self {
        self.special = special;
        self
    }

    /// Mark as static
    pub fn as_static(self) -> Self {
        self.with_special(Special::Static)
    }

    /// Mark as readonly
    pub fn as_readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Add an extended attribute
    pub fn with_ext_attr(mut self, attr: ExtendedAttribute) -> Self {
        self.ext_attrs.push(attr);
        self
    }

    /// Add an argument
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Name or empty string
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Flavour of an interface-like definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterfaceKind {
    Interface,
    Mixin,
    CallbackInterface,
    Namespace,
}

/// Interface, mixin, callback interface or namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDef {
    pub name: String,
    pub kind: InterfaceKind,
    #[serde(default)]
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inheritance: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ext_attrs: Vec<ExtendedAttribute>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl InterfaceDef {
    /// Create an empty, non-partial interface
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InterfaceKind::Interface,
            partial: false,
            inheritance: None,
            ext_attrs: vec![],
            members: vec![],
        }
    }
}

/// Dictionary field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryField {
    pub name: String,
    pub idl_type: IdlType,
    #[serde(default)]
    pub required: bool,
}

/// Dictionary definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryDef {
    pub name: String,
    #[serde(default)]
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inheritance: Option<String>,
    #[serde(default)]
    pub fields: Vec<DictionaryField>,
}

/// Enum definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    pub name: String,
    /// Values in declaration order
    pub values: Vec<String>,
}

/// Top-level definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Definition {
    Interface(InterfaceDef),
    Dictionary(DictionaryDef),
    Enum(EnumDef),
    Typedef { name: String, idl_type: IdlType },
    Callback { name: String, return_type: IdlType },
    Includes { target: String, mixin: String },
}

impl Definition {
    /// Definition name (`includes` statements report their target)
    pub fn name(&self) -> &str {
        match self {
            Definition::Interface(def) => &def.name,
            Definition::Dictionary(def) => &def.name,
            Definition::Enum(def) => &def.name,
            Definition::Typedef { name, .. } | Definition::Callback { name, .. } => name,
            Definition::Includes { target, .. } => target,
        }
    }

    /// Members, for interface-like definitions only
    pub fn members(&self) -> Option<&[Member]> {
        match self {
            Definition::Interface(def) => Some(&def.members),
            _ => None,
        }
    }

    /// Interface-like view
    pub fn as_interface(&self) -> Option<&InterfaceDef> {
        match self {
            Definition::Interface(def) => Some(def),
            _ => None,
        }
    }
}

/// Definitions parsed from one logical schema unit
///
/// Index 0 is the main definition: the registry document's own fragment is
/// always placed first when fragments are concatenated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdlFragmentSet {
    definitions: Vec<Definition>,
}

impl IdlFragmentSet {
    /// Wrap parsed definitions
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    /// All definitions in source order
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// The main definition
    pub fn main(&self) -> Option<&Definition> {
        self.definitions.first()
    }

    /// The main definition when it is interface-like
    pub fn main_interface(&self) -> Option<&InterfaceDef> {
        self.main().and_then(Definition::as_interface)
    }

    /// Dictionary fields from every dictionary fragment, in order
    pub fn dictionary_fields(&self) -> impl Iterator<Item = &DictionaryField> {
        self.definitions.iter().flat_map(|d| match d {
            Definition::Dictionary(dict) => dict.fields.as_slice(),
            _ => &[],
        })
    }

    /// Values of the first enum definition
    pub fn enum_values(&self) -> Option<&[String]> {
        self.definitions.iter().find_map(|d| match d {
            Definition::Enum(e) => Some(e.values.as_slice()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
