//! Lowering from the `weedle2` syntax tree
//!
//! `weedle2` keeps every token of the source; the documentation engine only
//! needs names, qualifiers, extended attribute names and type structure.
//! Everything is copied out into owned [`ast`](super::ast) values so parsed
//! fragments can outlive the source text they came from.

use std::fmt;

use weedle2::{argument, attribute, dictionary, interface, mixin, namespace, types};

use super::ast::{
    Argument, Definition, DictionaryDef, DictionaryField, EnumDef, ExtendedAttribute, GenericKind,
    IdlType, InterfaceDef, InterfaceKind, Member, MemberKind, Special,
};

/// Lower one top-level definition; `None` for forms with no documentation
/// counterpart.
pub fn definition(def: &weedle2::Definition<'_>) -> Option<Definition> {
    use weedle2::Definition as D;

    let lowered = match def {
        D::Interface(d) => Definition::Interface(InterfaceDef {
            inheritance: d.inheritance.as_ref().map(|i| i.identifier.0.to_string()),
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(interface_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::PartialInterface(d) => Definition::Interface(InterfaceDef {
            partial: true,
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(interface_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::CallbackInterface(d) => Definition::Interface(InterfaceDef {
            kind: InterfaceKind::CallbackInterface,
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(interface_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::InterfaceMixin(d) => Definition::Interface(InterfaceDef {
            kind: InterfaceKind::Mixin,
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(mixin_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::PartialInterfaceMixin(d) => Definition::Interface(InterfaceDef {
            kind: InterfaceKind::Mixin,
            partial: true,
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(mixin_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::Namespace(d) => Definition::Interface(InterfaceDef {
            kind: InterfaceKind::Namespace,
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(namespace_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::PartialNamespace(d) => Definition::Interface(InterfaceDef {
            kind: InterfaceKind::Namespace,
            partial: true,
            ext_attrs: ext_attrs(&d.attributes),
            members: d.members.body.iter().map(namespace_member).collect(),
            ..InterfaceDef::new(d.identifier.0)
        }),
        D::Dictionary(d) => Definition::Dictionary(DictionaryDef {
            name: d.identifier.0.to_string(),
            partial: false,
            inheritance: d.inheritance.as_ref().map(|i| i.identifier.0.to_string()),
            fields: d.members.body.iter().map(dictionary_field).collect(),
        }),
        D::PartialDictionary(d) => Definition::Dictionary(DictionaryDef {
            name: d.identifier.0.to_string(),
            partial: true,
            inheritance: None,
            fields: d.members.body.iter().map(dictionary_field).collect(),
        }),
        D::Enum(d) => Definition::Enum(EnumDef {
            name: d.identifier.0.to_string(),
            values: d
                .values
                .body
                .list
                .iter()
                .map(|v| v.value.0.to_string())
                .collect(),
        }),
        D::Typedef(d) => Definition::Typedef {
            name: d.identifier.0.to_string(),
            idl_type: d.type_.lower(),
        },
        D::Callback(d) => Definition::Callback {
            name: d.identifier.0.to_string(),
            return_type: d.return_type.lower(),
        },
        D::IncludesStatement(d) => Definition::Includes {
            target: d.lhs_identifier.0.to_string(),
            mixin: d.rhs_identifier.0.to_string(),
        },
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(lowered)
}

// ------------------------------------------------------------------
// Members
// ------------------------------------------------------------------

fn interface_member(member: &interface::InterfaceMember<'_>) -> Member {
    use interface::InterfaceMember as M;
    use interface::{StringifierOrInheritOrStatic as AttrModifier, StringifierOrStatic};

    match member {
        M::Const(c) => constant(c),
        M::Attribute(a) => Member {
            special: match &a.modifier {
                Some(AttrModifier::Static(_)) => Special::Static,
                Some(AttrModifier::Inherit(_)) => Special::Inherit,
                Some(AttrModifier::Stringifier(_)) => Special::Stringifier,
                None => Special::None,
            },
            readonly: a.readonly.is_some(),
            ext_attrs: ext_attrs(&a.attributes),
            ..Member::attribute(a.identifier.0, a.type_.lower())
        },
        M::Constructor(c) => Member {
            ext_attrs: ext_attrs(&c.attributes),
            arguments: arguments(&c.args.body),
            ..Member::constructor()
        },
        M::Operation(op) => {
            let modifier = match &op.modifier {
                Some(StringifierOrStatic::Static(_)) => Special::Static,
                Some(StringifierOrStatic::Stringifier(_)) => Special::Stringifier,
                None => Special::None,
            };
            let special = match &op.special {
                Some(interface::Special::Getter(_)) => Special::Getter,
                Some(interface::Special::Setter(_)) => Special::Setter,
                Some(interface::Special::Deleter(_)) => Special::Deleter,
                _ => modifier,
            };
            Member {
                name: op.identifier.as_ref().map(|i| i.0.to_string()),
                special,
                idl_type: Some(op.return_type.lower()),
                ext_attrs: ext_attrs(&op.attributes),
                arguments: arguments(&op.args.body),
                ..Member::new(MemberKind::Operation)
            }
        }
        other => Member::declaration(variant_keyword(other)),
    }
}

fn mixin_member(member: &mixin::MixinMember<'_>) -> Member {
    use mixin::MixinMember as M;

    match member {
        M::Const(c) => constant(c),
        M::Attribute(a) => Member {
            readonly: a.readonly.is_some(),
            ext_attrs: ext_attrs(&a.attributes),
            ..Member::attribute(a.identifier.0, a.type_.lower())
        },
        M::Operation(op) => Member {
            name: op.identifier.as_ref().map(|i| i.0.to_string()),
            idl_type: Some(op.return_type.lower()),
            ext_attrs: ext_attrs(&op.attributes),
            arguments: arguments(&op.args.body),
            ..Member::new(MemberKind::Operation)
        },
        other => Member::declaration(variant_keyword(other)),
    }
}

fn namespace_member(member: &namespace::NamespaceMember<'_>) -> Member {
    use namespace::NamespaceMember as M;

    match member {
        M::Attribute(a) => Member {
            ext_attrs: ext_attrs(&a.attributes),
            ..Member::attribute(a.identifier.0, a.type_.lower()).as_readonly()
        },
        M::Operation(op) => Member {
            name: op.identifier.as_ref().map(|i| i.0.to_string()),
            idl_type: Some(op.return_type.lower()),
            ext_attrs: ext_attrs(&op.attributes),
            arguments: arguments(&op.args.body),
            ..Member::new(MemberKind::Operation)
        },
        #[allow(unreachable_patterns)]
        other => Member::declaration(variant_keyword(other)),
    }
}

fn constant(c: &interface::ConstMember<'_>) -> Member {
    Member {
        ext_attrs: ext_attrs(&c.attributes),
        ..Member::constant(c.identifier.0, c.const_type.lower())
    }
}

fn dictionary_field(field: &dictionary::DictionaryMember<'_>) -> DictionaryField {
    DictionaryField {
        name: field.identifier.0.to_string(),
        idl_type: field.type_.lower(),
        required: field.required.is_some(),
    }
}

fn arguments(list: &argument::ArgumentList<'_>) -> Vec<Argument> {
    list.list
        .iter()
        .map(|arg| match arg {
            argument::Argument::Single(a) => Argument {
                optional: a.optional.is_some(),
                ext_attrs: ext_attrs(&a.attributes),
                ..Argument::new(a.identifier.0, a.type_.lower())
            },
            argument::Argument::Variadic(a) => Argument {
                variadic: true,
                ext_attrs: ext_attrs(&a.attributes),
                ..Argument::new(a.identifier.0, a.type_.lower())
            },
        })
        .collect()
}

fn ext_attrs(list: &Option<attribute::ExtendedAttributeList<'_>>) -> Vec<ExtendedAttribute> {
    list.iter()
        .flat_map(|l| l.body.list.iter())
        .filter_map(ext_attr_name)
        .map(ExtendedAttribute::new)
        .collect()
}

fn ext_attr_name<'a>(attr: &attribute::ExtendedAttribute<'a>) -> Option<&'a str> {
    use attribute::ExtendedAttribute as A;

    match attr {
        A::NoArgs(a) => Some((a.0).0),
        A::ArgList(a) => Some(a.identifier.0),
        A::NamedArgList(a) => Some(a.lhs_identifier.0),
        A::IdentList(a) => Some(a.identifier.0),
        A::Ident(a) => Some(a.lhs_identifier.0),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Keyword of a variant that carries nothing but its own spelling
/// (`DOMString`, `ArrayBuffer`, `iterable`). The variant names of these
/// forms are the IDL keywords, up to case.
fn variant_keyword<T: fmt::Debug>(value: &T) -> String {
    let debug = format!("{value:?}");
    let variant = debug
        .split(|c: char| !c.is_ascii_alphanumeric())
        .next()
        .unwrap_or_default();
    match variant {
        "Any" | "Boolean" | "Byte" | "Octet" | "Object" | "Symbol" | "Undefined" | "Iterable"
        | "Maplike" | "Setlike" | "Stringifier" => variant.to_lowercase(),
        "BigInt" => "bigint".to_string(),
        "AsyncIterable" => "async iterable".to_string(),
        other => other.to_string(),
    }
}

// ------------------------------------------------------------------
// Types
// ------------------------------------------------------------------

/// Conversion of a `weedle2` type node into an [`IdlType`]
trait Lower {
    fn lower(&self) -> IdlType;
}

fn nullable(ty: IdlType, q_mark: bool) -> IdlType {
    if q_mark {
        ty.nullable()
    } else {
        ty
    }
}

fn union(u: &types::UnionType<'_>) -> IdlType {
    IdlType::Union(u.body.list.iter().map(Lower::lower).collect())
}

impl Lower for types::Type<'_> {
    fn lower(&self) -> IdlType {
        match self {
            types::Type::Single(single) => single.lower(),
            types::Type::Union(u) => nullable(union(&u.type_), u.q_mark.is_some()),
        }
    }
}

impl Lower for types::AttributedType<'_> {
    fn lower(&self) -> IdlType {
        self.type_.lower()
    }
}

impl Lower for types::SingleType<'_> {
    fn lower(&self) -> IdlType {
        match self {
            types::SingleType::Any(_) => IdlType::named("any"),
            types::SingleType::NonAny(t) => t.lower(),
        }
    }
}

impl Lower for types::UnionMemberType<'_> {
    fn lower(&self) -> IdlType {
        match self {
            types::UnionMemberType::Single(t) => t.lower(),
            types::UnionMemberType::Union(u) => nullable(union(&u.type_), u.q_mark.is_some()),
        }
    }
}

impl Lower for types::AttributedNonAnyType<'_> {
    fn lower(&self) -> IdlType {
        self.type_.lower()
    }
}

impl Lower for types::NonAnyType<'_> {
    fn lower(&self) -> IdlType {
        use types::NonAnyType as T;

        match self {
            T::Promise(p) => IdlType::generic(GenericKind::Promise, vec![p.generics.body.lower()]),
            T::Integer(t) => nullable(t.type_.lower(), t.q_mark.is_some()),
            T::FloatingPoint(t) => nullable(t.type_.lower(), t.q_mark.is_some()),
            T::Sequence(t) => nullable(
                IdlType::generic(GenericKind::Sequence, vec![t.type_.generics.body.lower()]),
                t.q_mark.is_some(),
            ),
            T::FrozenArrayType(t) => nullable(
                IdlType::generic(GenericKind::FrozenArray, vec![t.type_.generics.body.lower()]),
                t.q_mark.is_some(),
            ),
            T::RecordType(t) => {
                let (key, _, value) = &t.type_.generics.body;
                nullable(
                    IdlType::generic(GenericKind::Record, vec![key.lower(), value.lower()]),
                    t.q_mark.is_some(),
                )
            }
            T::Identifier(t) => nullable(IdlType::named(t.type_.0), t.q_mark.is_some()),
            other => IdlType::named(variant_keyword(other)),
        }
    }
}

impl Lower for types::RecordKeyType<'_> {
    fn lower(&self) -> IdlType {
        match self {
            types::RecordKeyType::Byte(_) => IdlType::named("ByteString"),
            types::RecordKeyType::DOM(_) => IdlType::named("DOMString"),
            types::RecordKeyType::USV(_) => IdlType::named("USVString"),
            types::RecordKeyType::NonAny(t) => t.lower(),
        }
    }
}

impl Lower for types::ReturnType<'_> {
    fn lower(&self) -> IdlType {
        match self {
            types::ReturnType::Type(t) => t.lower(),
            #[allow(unreachable_patterns)]
            _ => IdlType::named("undefined"),
        }
    }
}

impl Lower for types::ConstType<'_> {
    fn lower(&self) -> IdlType {
        match self {
            types::ConstType::Integer(t) => t.type_.lower(),
            types::ConstType::FloatingPoint(t) => t.type_.lower(),
            types::ConstType::Identifier(t) => IdlType::named(t.type_.0),
            other => IdlType::named(variant_keyword(other)),
        }
    }
}

impl Lower for types::IntegerType {
    fn lower(&self) -> IdlType {
        let (unsigned, base) = match self {
            types::IntegerType::LongLong(t) => (t.unsigned.is_some(), "long long"),
            types::IntegerType::Long(t) => (t.unsigned.is_some(), "long"),
            types::IntegerType::Short(t) => (t.unsigned.is_some(), "short"),
        };
        if unsigned {
            IdlType::named(format!("unsigned {base}"))
        } else {
            IdlType::named(base)
        }
    }
}

impl Lower for types::FloatingPointType {
    fn lower(&self) -> IdlType {
        let (unrestricted, base) = match self {
            types::FloatingPointType::Float(t) => (t.unrestricted.is_some(), "float"),
            types::FloatingPointType::Double(t) => (t.unrestricted.is_some(), "double"),
        };
        if unrestricted {
            IdlType::named(format!("unrestricted {base}"))
        } else {
            IdlType::named(base)
        }
    }
}
