//! Type descriptions
//!
//! Turns IDL type descriptors into prose for documentation pages. Named
//! types are looked up in the registry: dictionaries expand into a bulleted
//! key list, enums into their values, and everything else (interfaces,
//! typedefs, unresolvable names) becomes a cross-reference macro.
//!
//! Resolution is best effort. A name that cannot be fetched or parsed is
//! logged and rendered as a cross-reference; formatting never fails.

use crate::idl::{DictionaryField, GenericKind, IdlType};
use crate::registry::{parse_named, DocumentKind, SchemaRegistry};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Label for a recognized IDL primitive
pub fn primitive_label(name: &str) -> Option<&'static str> {
    match name {
        "boolean" => Some("boolean"),
        "object" => Some("object"),
        "undefined" => Some("undefined"),
        "any" => Some("any"),
        "byte" | "octet" | "short" | "unsigned short" | "long" | "unsigned long" | "long long"
        | "unsigned long long" => Some("integer"),
        "float" | "unrestricted float" => Some("float"),
        "double" | "unrestricted double" => Some("double-precision floating-point value"),
        "bigint" | "DOMString" | "ByteString" | "USVString" => Some("string"),
        _ => None,
    }
}

/// Cross-reference macro for an interface name
pub fn xref(name: &str) -> String {
    format!("{{{{domxref(\"{name}\")}}}}")
}

/// One key of an expanded dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryKey {
    pub name: String,
    pub optional: bool,
    pub description: TypeDescription,
}

/// Structured description of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum TypeDescription {
    /// Primitive label
    Text(String),
    /// Opaque cross-reference to a named type
    Reference(String),
    /// Union
    OneOf(Vec<TypeDescription>),
    /// sequence, FrozenArray, ObservableArray
    ArrayOf(Box<TypeDescription>),
    /// record
    KeyValue {
        key: Box<TypeDescription>,
        value: Box<TypeDescription>,
    },
    /// Promise
    PromiseOf(Box<TypeDescription>),
    /// Any other generic
    GenericOf {
        tag: String,
        inner: Box<TypeDescription>,
    },
    /// Expanded dictionary
    Dictionary(Vec<DictionaryKey>),
    /// Enum values in declaration order
    EnumValues(Vec<String>),
}

impl TypeDescription {
    /// Render to Markdown. `depth` only controls the indentation of nested
    /// bullet lists.
    pub fn render(&self, depth: usize) -> String {
        match self {
            TypeDescription::Text(label) => label.clone(),
            TypeDescription::Reference(name) => xref(name),
            TypeDescription::OneOf(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.render(depth + 1)).collect();
                format!("one of {}", parts.join(", "))
            }
            TypeDescription::ArrayOf(inner) => format!("an array of {}", inner.render(depth + 1)),
            TypeDescription::KeyValue { key, value } => format!(
                "a key-value pair {},{}",
                key.render(depth),
                value.render(depth + 1)
            ),
            TypeDescription::PromiseOf(inner) => format!("a promise of {}", inner.render(depth + 1)),
            TypeDescription::GenericOf { tag, inner } => {
                format!("{tag} of type {}", inner.render(depth + 1))
            }
            TypeDescription::Dictionary(keys) => {
                let mut out = String::from("an object with the following keys:");
                for key in keys {
                    out.push('\n');
                    out.push_str(&indent(depth));
                    out.push_str(&format!("- `{}`", key.name));
                    if key.optional {
                        out.push_str(" (optional)");
                    }
                    out.push_str(": ");
                    out.push_str(&key.description.render(depth + 1));
                }
                out
            }
            TypeDescription::EnumValues(values) => {
                let mut out = String::from("one of the following string values:");
                for value in values {
                    out.push('\n');
                    out.push_str(&indent(depth));
                    out.push_str(&format!("- `\"{value}\"`"));
                }
                out
            }
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Depth of a type written on the `  - : ` definition line of a list item
pub const LIST_ITEM_DEPTH: usize = 2;

/// What a registry name turned out to be
enum Resolved {
    Dictionary(Vec<DictionaryField>),
    Enum(Vec<String>),
    Opaque,
}

/// Describes types, resolving names through a registry
pub struct TypeFormatter<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> TypeFormatter<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Describe `ty` and render it at `depth`
    pub async fn format(&self, ty: &IdlType, depth: usize) -> String {
        self.describe(ty).await.render(depth)
    }

    /// Structured description of `ty`
    pub async fn describe(&self, ty: &IdlType) -> TypeDescription {
        self.describe_in(ty, &[]).await
    }

    /// `chain` holds the names being expanded above this call; a name already
    /// on it is emitted as a reference so recursive dictionaries terminate.
    fn describe_in<'a>(&'a self, ty: &'a IdlType, chain: &'a [String]) -> BoxFuture<'a, TypeDescription> {
        async move {
            match ty {
                IdlType::Union(members) => {
                    let parts = join_all(members.iter().map(|m| self.describe_in(m, chain))).await;
                    TypeDescription::OneOf(parts)
                }
                IdlType::Nullable(inner) => self.describe_in(inner, chain).await,
                IdlType::Generic { kind, args } => self.describe_generic(kind, args, chain).await,
                IdlType::Named(name) => self.describe_named(name, chain).await,
            }
        }
        .boxed()
    }

    async fn describe_generic(
        &self,
        kind: &GenericKind,
        args: &[IdlType],
        chain: &[String],
    ) -> TypeDescription {
        let Some(first) = args.first() else {
            return TypeDescription::Text(kind.tag().to_string());
        };
        let inner = Box::new(self.describe_in(first, chain).await);
        match kind {
            k if k.is_array_like() => TypeDescription::ArrayOf(inner),
            GenericKind::Record => match args.get(1) {
                Some(value) => TypeDescription::KeyValue {
                    key: inner,
                    value: Box::new(self.describe_in(value, chain).await),
                },
                None => TypeDescription::GenericOf {
                    tag: kind.tag().to_string(),
                    inner,
                },
            },
            GenericKind::Promise => TypeDescription::PromiseOf(inner),
            other => TypeDescription::GenericOf {
                tag: other.tag().to_string(),
                inner,
            },
        }
    }

    async fn describe_named(&self, name: &str, chain: &[String]) -> TypeDescription {
        if let Some(label) = primitive_label(name) {
            return TypeDescription::Text(label.to_string());
        }
        if chain.iter().any(|n| n == name) {
            debug!("{} is already being expanded, emitting a reference", name);
            return TypeDescription::Reference(name.to_string());
        }

        match self.resolve(name).await {
            Resolved::Dictionary(fields) => {
                let mut next = chain.to_vec();
                next.push(name.to_string());
                let descriptions =
                    join_all(fields.iter().map(|f| self.describe_in(&f.idl_type, &next))).await;
                let keys = fields
                    .iter()
                    .zip(descriptions)
                    .map(|(field, description)| DictionaryKey {
                        name: field.name.clone(),
                        optional: !field.required,
                        description,
                    })
                    .collect();
                TypeDescription::Dictionary(keys)
            }
            Resolved::Enum(values) => TypeDescription::EnumValues(values),
            Resolved::Opaque => TypeDescription::Reference(name.to_string()),
        }
    }

    async fn resolve(&self, name: &str) -> Resolved {
        let doc = match self.registry.idl(name).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Could not resolve type {}: {}", name, e);
                return Resolved::Opaque;
            }
        };

        match doc.kind {
            DocumentKind::Dictionary | DocumentKind::Enum => {}
            DocumentKind::Interface
            | DocumentKind::InterfaceMixin
            | DocumentKind::CallbackInterface
            | DocumentKind::Namespace => return Resolved::Opaque,
            other => {
                warn!("Type {} is a {:?}, emitting a reference", name, other);
                return Resolved::Opaque;
            }
        }

        let set = match parse_named(name, &doc.combined_source()) {
            Ok(set) => set,
            Err(e) => {
                warn!("Could not resolve type {}: {}", name, e);
                return Resolved::Opaque;
            }
        };

        if doc.kind == DocumentKind::Enum {
            return match set.enum_values() {
                Some(values) => Resolved::Enum(values.to_vec()),
                None => {
                    warn!("{} is listed as an enum but defines none", name);
                    Resolved::Opaque
                }
            };
        }

        let mut fields: Vec<DictionaryField> = Vec::new();
        for field in set.dictionary_fields() {
            if !fields.iter().any(|f| f.name == field.name) {
                fields.push(field.clone());
            }
        }
        Resolved::Dictionary(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idl::IdlType;
    use crate::test::mock_registry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primitive_table() {
        let table = [
            ("boolean", "boolean"),
            ("object", "object"),
            ("undefined", "undefined"),
            ("any", "any"),
            ("byte", "integer"),
            ("octet", "integer"),
            ("short", "integer"),
            ("unsigned short", "integer"),
            ("long", "integer"),
            ("unsigned long", "integer"),
            ("long long", "integer"),
            ("unsigned long long", "integer"),
            ("float", "float"),
            ("unrestricted float", "float"),
            ("double", "double-precision floating-point value"),
            ("unrestricted double", "double-precision floating-point value"),
            ("bigint", "string"),
            ("DOMString", "string"),
            ("ByteString", "string"),
            ("USVString", "string"),
        ];
        for (name, label) in table {
            assert_eq!(primitive_label(name), Some(label), "{name}");
        }
        assert_eq!(primitive_label("symbol"), None);
        assert_eq!(primitive_label("Node"), None);
    }

    #[tokio::test]
    async fn test_union_of_primitives() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);
        let ty = IdlType::Union(vec![IdlType::named("DOMString"), IdlType::named("long")]);
        assert_eq!(formatter.format(&ty, 0).await, "one of string, integer");
    }

    #[tokio::test]
    async fn test_generics() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);

        let seq = IdlType::generic(GenericKind::FrozenArray, vec![IdlType::named("double")]);
        assert_eq!(
            formatter.format(&seq, 0).await,
            "an array of double-precision floating-point value"
        );

        let promise = IdlType::generic(GenericKind::Promise, vec![IdlType::named("undefined")]);
        assert_eq!(formatter.format(&promise, 0).await, "a promise of undefined");

        let record = IdlType::generic(
            GenericKind::Record,
            vec![IdlType::named("DOMString"), IdlType::named("boolean")],
        );
        assert_eq!(
            formatter.format(&record, 0).await,
            "a key-value pair string,boolean"
        );

        let other = IdlType::generic(
            GenericKind::Other("Iterator".into()),
            vec![IdlType::named("octet")],
        );
        assert_eq!(formatter.format(&other, 0).await, "Iterator of type integer");
    }

    #[tokio::test]
    async fn test_interface_becomes_reference() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);
        let ty = IdlType::named("Node").nullable();
        assert_eq!(
            formatter.describe(&ty).await,
            TypeDescription::Reference("Node".into())
        );
        assert_eq!(formatter.format(&ty, 0).await, "{{domxref(\"Node\")}}");
    }

    #[tokio::test]
    async fn test_unresolvable_name_falls_back() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);
        let ty = IdlType::named("NoSuchThing");
        assert_eq!(
            formatter.describe(&ty).await,
            TypeDescription::Reference("NoSuchThing".into())
        );
        // symbol is not in the primitive table and resolves like any name
        assert_eq!(
            formatter.describe(&IdlType::named("symbol")).await,
            TypeDescription::Reference("symbol".into())
        );
    }

    #[tokio::test]
    async fn test_enum_values_in_declaration_order() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);
        let text = formatter.format(&IdlType::named("ScrollBehavior"), 0).await;
        assert_eq!(
            text,
            "one of the following string values:\n- `\"smooth\"`\n- `\"instant\"`\n- `\"auto\"`"
        );
    }

    #[tokio::test]
    async fn test_sequence_of_dictionary_indents_per_level() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);
        let ty = IdlType::generic(GenericKind::Sequence, vec![IdlType::named("GetRootNodeOptions")]);
        let text = formatter.format(&ty, 0).await;
        assert_eq!(
            text,
            "an array of an object with the following keys:\n  - `composed` (optional): boolean\n  - `scope` (optional): an object with the following keys:\n    - `mode`: one of the following string values:\n      - `\"open\"`\n      - `\"closed\"`"
        );
    }

    #[tokio::test]
    async fn test_recursive_dictionary_terminates() {
        let registry = mock_registry();
        let formatter = TypeFormatter::new(&registry);
        let text = formatter.format(&IdlType::named("TreeNodeInit"), 0).await;
        assert_eq!(
            text,
            "an object with the following keys:\n- `label`: string\n- `children` (optional): an array of {{domxref(\"TreeNodeInit\")}}"
        );
    }
}
