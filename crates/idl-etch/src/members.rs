//! Member extraction
//!
//! Collects the documentable members of a fragment set. Overloads collapse
//! into their first declaration so documentation shows one entry per name.

use crate::idl::{IdlFragmentSet, Member, MemberKind};
use crate::predicates::Predicate;
use std::cmp::Ordering;

/// Identity used for overload de-duplication
#[derive(Debug, PartialEq, Eq)]
enum MemberIdentity<'a> {
    Constructor,
    Named(Option<&'a str>),
}

impl<'a> MemberIdentity<'a> {
    fn of(member: &'a Member) -> Self {
        if member.kind == MemberKind::Constructor {
            MemberIdentity::Constructor
        } else {
            MemberIdentity::Named(member.name.as_deref())
        }
    }
}

/// Extract members matching every predicate.
///
/// Only interface-like definitions contribute. A member is kept only if it
/// is the first occurrence of its identity in the flattened member list
/// (all constructors share one identity, everything else is keyed by name),
/// so overloads appear once. Discovery order is preserved.
///
/// Returns `None` when nothing matches.
pub fn extract(fragments: &IdlFragmentSet, predicates: &[Predicate<'_>]) -> Option<Vec<Member>> {
    let flattened: Vec<&Member> = fragments
        .definitions()
        .iter()
        .filter_map(|d| d.members())
        .flatten()
        .collect();

    let mut seen: Vec<MemberIdentity<'_>> = Vec::new();
    let mut result = Vec::new();
    for member in flattened {
        let identity = MemberIdentity::of(member);
        if seen.contains(&identity) {
            continue;
        }
        seen.push(identity);
        if predicates.iter().all(|p| p(member)) {
            result.push(member.clone());
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

/// English, case-insensitive name ordering; on a tie lowercase sorts first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Sort members alphabetically by name
pub fn sort_by_name(members: &mut [Member]) {
    members.sort_by(|a, b| compare_names(a.name_or_empty(), b.name_or_empty()));
}
