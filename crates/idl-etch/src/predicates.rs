//! Member predicates
//!
//! Small composable tests over interface members. A slice of predicates is
//! combined by logical AND when handed to [`crate::members::extract`].

use crate::idl::{ExtendedAttribute, Member, MemberKind, Special};

/// A borrowed member test
pub type Predicate<'a> = &'a (dyn Fn(&Member) -> bool + Sync);

/// Extended attribute restricting availability to secure contexts
pub const SECURE_CONTEXT: &str = "SecureContext";

/// Type name marking an event handler attribute
pub const EVENT_HANDLER: &str = "EventHandler";

/// Prefix of event handler attribute names
pub const EVENT_HANDLER_PREFIX: &str = "on";

/// `static` members. Constants are always accessed on the interface object
/// and count as static.
pub fn is_static(member: &Member) -> bool {
    member.special == Special::Static || member.kind == MemberKind::Const
}

/// Attributes, including constants (read-only attributes with a fixed value)
pub fn is_attribute(member: &Member) -> bool {
    matches!(member.kind, MemberKind::Attribute | MemberKind::Const)
}

pub fn is_operation(member: &Member) -> bool {
    member.kind == MemberKind::Operation
}

pub fn is_constructor(member: &Member) -> bool {
    member.kind == MemberKind::Constructor
}

/// `onfoo` attributes typed exactly `EventHandler`.
///
/// A union that merely contains `EventHandler` does not qualify.
pub fn is_event_handler(member: &Member) -> bool {
    member.kind == MemberKind::Attribute
        && member
            .name
            .as_deref()
            .is_some_and(|name| name.starts_with(EVENT_HANDLER_PREFIX))
        && member
            .idl_type
            .as_ref()
            .and_then(|t| t.named_type())
            .is_some_and(|name| name == EVENT_HANDLER)
}

/// Members carrying a name
pub fn is_named(member: &Member) -> bool {
    member.name.as_deref().is_some_and(|name| !name.is_empty())
}

/// Members annotated `[SecureContext]`
pub fn has_security_context(member: &Member) -> bool {
    member.ext_attrs.iter().any(is_secure_context_attr)
}

/// Whether an extended attribute is `SecureContext`
pub fn is_secure_context_attr(attr: &ExtendedAttribute) -> bool {
    attr.name == SECURE_CONTEXT
}

/// Members named exactly `name`
pub fn has_name(name: &str) -> impl Fn(&Member) -> bool + Sync + '_ {
    move |member: &Member| member.name.as_deref() == Some(name)
}

/// Negate a predicate
pub fn not<F>(f: F) -> impl Fn(&Member) -> bool + Sync
where
    F: Fn(&Member) -> bool + Sync,
{
    move |member: &Member| !f(member)
}

/// Event name for an event handler attribute (`onclick` -> `click`)
pub fn event_name(member: &Member) -> Option<&str> {
    member
        .name
        .as_deref()
        .and_then(|name| name.strip_prefix(EVENT_HANDLER_PREFIX))
}
