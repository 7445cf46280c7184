//! WebIDL front end
//!
//! Registry fragments are parsed with `weedle2` and lowered into the owned
//! syntax tree in [`ast`]. Parsing is strict: text the grammar does not
//! accept is reported with its location instead of being skipped.

pub mod ast;
mod lower;

use std::borrow::Cow;

use thiserror::Error;
use weedle2::Parse;

pub use ast::{
    Argument, Definition, DictionaryDef, DictionaryField, EnumDef, ExtendedAttribute, GenericKind,
    IdlFragmentSet, IdlType, InterfaceDef, InterfaceKind, Member, MemberKind, Special,
};

/// IDL syntax error with 1-indexed location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{col}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
        }
    }

    /// Error pointing at byte `offset` of `source`
    fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count())
            + 1;
        Self::new(message, line, col)
    }
}

/// Parse WebIDL source into top-level definitions
pub fn parse(source: &str) -> Result<Vec<Definition>, ParseError> {
    let source = normalize_wildcards(source);
    let (rest, parsed) = weedle2::Definitions::parse(&*source).map_err(|e| {
        ParseError::new(format!("invalid WebIDL: {}", snippet(&format!("{e:?}"))), 1, 1)
    })?;

    if !is_blank(rest) {
        let rest = rest.trim_start();
        let offset = source.len() - rest.len();
        return Err(ParseError::at(
            &source,
            offset,
            format!("unexpected `{}`", snippet(rest)),
        ));
    }
    Ok(parsed.iter().filter_map(lower::definition).collect())
}

/// Parse a single IDL source text into a fragment set
pub fn parse_fragment_set(source: &str) -> Result<IdlFragmentSet, ParseError> {
    parse(source).map(IdlFragmentSet::new)
}

/// `[Exposed=*]` is outside the grammar `weedle2` accepts. The wildcard is
/// swapped for a one-letter identifier so byte offsets are unchanged.
fn normalize_wildcards(source: &str) -> Cow<'_, str> {
    if source.contains("=*") {
        Cow::Owned(source.replace("=*", "=A"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Whether only whitespace and comments remain
fn is_blank(mut rest: &str) -> bool {
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            match after.split_once("*/") {
                Some((_, tail)) => rest = tail,
                None => return false,
            }
        } else {
            return rest.is_empty();
        }
    }
}

/// First line of `text`, shortened for error messages
fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() > 40 {
        format!("{}...", line.chars().take(40).collect::<String>())
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn interface(source: &str) -> InterfaceDef {
        match parse(source).unwrap().remove(0) {
            Definition::Interface(def) => def,
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_interface_header() {
        let def = interface(
            "[Exposed=Window, SecureContext]\ninterface Node : EventTarget {\n  readonly attribute unsigned short nodeType;\n};",
        );
        assert_eq!(def.name, "Node");
        assert_eq!(def.inheritance.as_deref(), Some("EventTarget"));
        assert_eq!(
            def.ext_attrs,
            vec![
                ExtendedAttribute::new("Exposed"),
                ExtendedAttribute::new("SecureContext"),
            ]
        );
        assert_eq!(def.members.len(), 1);
        let member = &def.members[0];
        assert_eq!(member.kind, MemberKind::Attribute);
        assert!(member.readonly);
        assert_eq!(member.idl_type, Some(IdlType::named("unsigned short")));
    }

    #[test]
    fn test_exposed_wildcard() {
        let def = interface("[Exposed=*]\ninterface EventTarget { constructor(); };");
        assert_eq!(def.ext_attrs, vec![ExtendedAttribute::new("Exposed")]);
        assert_eq!(def.members[0].kind, MemberKind::Constructor);
    }

    #[test]
    fn test_parse_operations_and_constructor() {
        let def = interface(
            r#"interface Foo {
                constructor(optional DOMString init = "", long... rest);
                static Promise<undefined> bar(sequence<(long or DOMString)> items);
                getter any (unsigned long index);
                [SecureContext] undefined baz();
            };"#,
        );
        assert_eq!(def.members.len(), 4);

        let ctor = &def.members[0];
        assert_eq!(ctor.kind, MemberKind::Constructor);
        assert!(ctor.arguments[0].optional);
        assert!(ctor.arguments[1].variadic);
        assert_eq!(ctor.arguments[1].name, "rest");

        let bar = &def.members[1];
        assert_eq!(bar.special, Special::Static);
        assert_eq!(bar.name.as_deref(), Some("bar"));
        assert_eq!(
            bar.idl_type.as_ref().map(|t| t.to_idl()),
            Some("Promise<undefined>".to_string())
        );
        assert_eq!(
            bar.arguments[0].idl_type.to_idl(),
            "sequence<(long or DOMString)>"
        );

        let getter = &def.members[2];
        assert_eq!(getter.special, Special::Getter);
        assert_eq!(getter.name, None);

        let baz = &def.members[3];
        assert_eq!(baz.ext_attrs, vec![ExtendedAttribute::new("SecureContext")]);
        assert!(baz.idl_type.as_ref().is_some_and(IdlType::is_undefined));
    }

    #[test]
    fn test_parse_const_attributes_and_declarations() {
        let def = interface(
            "interface Headers {
                const unsigned short ELEMENT_NODE = 1;
                static attribute boolean flag;
                inherit attribute DOMString label;
                attribute (Node or DOMString)? target;
                iterable<ByteString, ByteString>;
                readonly setlike<DOMString>;
            };",
        );
        assert_eq!(def.members[0].kind, MemberKind::Const);
        assert_eq!(def.members[0].name.as_deref(), Some("ELEMENT_NODE"));
        assert_eq!(
            def.members[0].idl_type,
            Some(IdlType::named("unsigned short"))
        );
        assert_eq!(def.members[1].special, Special::Static);
        assert_eq!(def.members[1].idl_type, Some(IdlType::named("boolean")));
        assert_eq!(def.members[2].special, Special::Inherit);
        assert_eq!(
            def.members[3].idl_type.as_ref().map(|t| t.to_idl()),
            Some("(Node or DOMString)?".to_string())
        );
        assert_eq!(def.members[4].kind, MemberKind::Declaration);
        assert_eq!(def.members[4].name.as_deref(), Some("iterable"));
        assert_eq!(def.members[5].name.as_deref(), Some("setlike"));
    }

    #[test]
    fn test_parse_dictionary_and_enum() {
        let defs = parse(
            r#"dictionary EventInit { boolean bubbles = false; required DOMString type; };
               partial dictionary EventInit { record<DOMString, any> extra; };
               enum ScrollBehavior { "auto", "instant", "smooth" };"#,
        )
        .unwrap();
        match &defs[0] {
            Definition::Dictionary(dict) => {
                assert_eq!(dict.fields.len(), 2);
                assert!(!dict.fields[0].required);
                assert!(dict.fields[1].required);
                assert_eq!(dict.fields[1].name, "type");
            }
            other => panic!("expected dictionary, got {other:?}"),
        }
        match &defs[1] {
            Definition::Dictionary(dict) => {
                assert!(dict.partial);
                assert_eq!(dict.fields[0].idl_type.to_idl(), "record<DOMString, any>");
            }
            other => panic!("expected dictionary, got {other:?}"),
        }
        match &defs[2] {
            Definition::Enum(e) => assert_eq!(e.values, vec!["auto", "instant", "smooth"]),
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_mixins_and_includes() {
        let defs = parse(
            "interface mixin ParentNode { readonly attribute unsigned long childElementCount; };\nDocument includes ParentNode;",
        )
        .unwrap();
        assert_eq!(defs[0].as_interface().map(|i| i.kind), Some(InterfaceKind::Mixin));
        assert_eq!(
            defs[1],
            Definition::Includes {
                target: "Document".into(),
                mixin: "ParentNode".into()
            }
        );
    }

    #[test]
    fn test_parse_nullable_sequence_and_typedef() {
        let defs = parse("typedef sequence<DOMString>? Names;").unwrap();
        match &defs[0] {
            Definition::Typedef { name, idl_type } => {
                assert_eq!(name, "Names");
                assert_eq!(idl_type.to_idl(), "sequence<DOMString>?");
            }
            other => panic!("expected typedef, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_member_is_an_error() {
        let err = parse("interface A {\n  attribute Promise<undefined>[] y;\n};").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.starts_with("unexpected `interface A"));
    }

    #[test]
    fn test_error_points_at_failing_definition() {
        let err = parse("interface A {};\n\ninterface {").unwrap_err();
        assert_eq!((err.line, err.col), (3, 1));
    }

    #[test]
    fn test_trailing_comments_are_ignored() {
        let defs = parse("interface A {};\n// trailing\n/* block */\n").unwrap();
        assert_eq!(defs.len(), 1);
    }
}
