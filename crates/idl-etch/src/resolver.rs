//! Interface resolution
//!
//! Fetches an interface's IDL document, parses own fragment, partials and
//! mixins as one set, and derives the member categories that pages show.

use crate::diagnostics::{EtchError, EtchResult};
use crate::format::{TypeFormatter, LIST_ITEM_DEPTH};
use crate::idl::{IdlFragmentSet, InterfaceDef, Member, MemberKind};
use crate::members::{compare_names, extract, sort_by_name};
use crate::predicates::{
    event_name, has_name, has_security_context, is_attribute, is_constructor, is_event_handler,
    is_named, is_operation, is_secure_context_attr, is_static, not, EVENT_HANDLER_PREFIX,
};
use crate::registry::SchemaRegistry;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Name of the base event interface, which adds no properties
pub const BASE_EVENT: &str = "Event";

/// A property with its formatted type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub name: String,
    pub formatted_type: String,
    pub is_readonly: bool,
    pub is_secure_context: bool,
}

/// A method name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEntry {
    pub name: String,
    pub is_secure_context: bool,
}

impl From<&Member> for MethodEntry {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name_or_empty().to_string(),
            is_secure_context: has_security_context(member),
        }
    }
}

/// The four documented member categories; `None` means no members
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberGroups {
    pub static_properties: Option<Vec<PropertyEntry>>,
    pub properties: Option<Vec<PropertyEntry>>,
    pub static_methods: Option<Vec<MethodEntry>>,
    pub methods: Option<Vec<MethodEntry>>,
}

/// Everything an interface page needs from the IDL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceData {
    pub name: String,
    pub is_secure_context: bool,
    pub has_constructor: bool,
    pub members: MemberGroups,
    /// Sorted, without the `on` prefix
    pub event_names: Vec<String>,
    pub parent_name: Option<String>,
    /// Present exactly when `parent_name` is
    pub parent_members: Option<MemberGroups>,
}

/// A single member looked up by selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    pub member: Member,
    /// Interface or member carries `[SecureContext]`
    pub is_secure_context: bool,
}

/// Event handler plus what the events table says about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub handler: Member,
    pub is_secure_context: bool,
    /// `None` when the events table has no matching entry
    pub event_interface: Option<String>,
    pub parent_event_interface: Option<String>,
    pub event_properties: Vec<PropertyEntry>,
}

/// A member listed in the member index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub name: String,
    pub is_static: bool,
}

/// What can be documented on an interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberIndex {
    pub properties: Vec<IndexEntry>,
    pub has_constructor: bool,
    pub methods: Vec<IndexEntry>,
    pub events: Vec<String>,
}

fn interface_of<'a>(name: &str, set: &'a IdlFragmentSet) -> EtchResult<&'a InterfaceDef> {
    set.main_interface().ok_or_else(|| EtchError::NotAnInterface {
        name: name.to_string(),
    })
}

fn sorted(members: Option<Vec<Member>>) -> Option<Vec<Member>> {
    members.map(|mut m| {
        sort_by_name(&mut m);
        m
    })
}

/// Resolves interfaces, members and events through a registry
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<SchemaRegistry>,
}

impl Resolver {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Formatter bound to this resolver's registry
    pub fn formatter(&self) -> TypeFormatter<'_> {
        TypeFormatter::new(&self.registry)
    }

    /// Own fragment, partials and mixins of `interface`
    pub async fn fragments(&self, interface: &str) -> EtchResult<IdlFragmentSet> {
        let (_, set) = self.registry.parsed_idl(interface).await?;
        interface_of(interface, &set)?;
        Ok(set)
    }

    /// Resolve everything the interface overview shows
    pub async fn resolve_interface(&self, interface: &str) -> EtchResult<InterfaceData> {
        let (doc, set) = self.registry.parsed_idl(interface).await?;
        let main = interface_of(interface, &set)?;

        let is_secure_context = main.ext_attrs.iter().any(is_secure_context_attr);
        let has_constructor = extract(&set, &[&is_constructor]).is_some();
        let members = self.member_groups(&set).await;

        let mut event_names: Vec<String> = extract(&set, &[&is_event_handler])
            .unwrap_or_default()
            .iter()
            .filter_map(|m| event_name(m).map(str::to_string))
            .collect();
        event_names.sort_by(|a, b| compare_names(a, b));

        let (parent_name, parent_members) = match &main.inheritance {
            None => (None, None),
            Some(parent) => {
                let parent_set = match doc.parent_source() {
                    Some((name, fragment)) => crate::registry::parse_named(name, fragment)?,
                    None => {
                        debug!("{} has no inline parent fragment, fetching {}", interface, parent);
                        let parent_doc = self.registry.idl(parent).await?;
                        crate::registry::parse_named(parent, &parent_doc.defined.fragment)?
                    }
                };
                let groups = self.member_groups(&parent_set).await;
                (Some(parent.clone()), Some(groups))
            }
        };

        Ok(InterfaceData {
            name: interface.to_string(),
            is_secure_context,
            has_constructor,
            members,
            event_names,
            parent_name,
            parent_members,
        })
    }

    async fn member_groups(&self, set: &IdlFragmentSet) -> MemberGroups {
        let not_static = not(is_static);
        let not_handler = not(is_event_handler);

        let static_properties = sorted(extract(set, &[&is_attribute, &is_static]));
        let properties = sorted(extract(set, &[&is_attribute, &not_static, &not_handler]));
        let static_methods = sorted(extract(set, &[&is_operation, &is_named, &is_static]));
        let methods = sorted(extract(set, &[&is_operation, &is_named, &not_static]));

        let (static_properties, properties) = futures::join!(
            self.property_entries(static_properties),
            self.property_entries(properties)
        );

        MemberGroups {
            static_properties,
            properties,
            static_methods: static_methods.map(|m| m.iter().map(MethodEntry::from).collect()),
            methods: methods.map(|m| m.iter().map(MethodEntry::from).collect()),
        }
    }

    async fn property_entries(&self, members: Option<Vec<Member>>) -> Option<Vec<PropertyEntry>> {
        let members = members?;
        let formatter = self.formatter();
        let types = join_all(members.iter().map(|m| async {
            match &m.idl_type {
                Some(ty) => formatter.format(ty, LIST_ITEM_DEPTH).await,
                None => String::new(),
            }
        }))
        .await;

        Some(
            members
                .iter()
                .zip(types)
                .map(|(m, formatted_type)| PropertyEntry {
                    name: m.name_or_empty().to_string(),
                    formatted_type,
                    is_readonly: m.readonly || m.kind == MemberKind::Const,
                    is_secure_context: has_security_context(m),
                })
                .collect(),
        )
    }

    /// Look up a named member with the given static-ness
    pub async fn resolve_member(
        &self,
        interface: &str,
        name: &str,
        is_static_member: bool,
    ) -> EtchResult<ResolvedMember> {
        let set = self.fragments(interface).await?;
        let named = has_name(name);
        let not_static = not(is_static);
        let found = if is_static_member {
            extract(&set, &[&is_static, &named])
        } else {
            extract(&set, &[&not_static, &named])
        };
        self.first_member(interface, name, &set, found)
    }

    /// The interface's constructor
    pub async fn resolve_constructor(&self, interface: &str) -> EtchResult<ResolvedMember> {
        let set = self.fragments(interface).await?;
        let found = extract(&set, &[&is_constructor]);
        self.first_member(interface, "constructor", &set, found)
    }

    fn first_member(
        &self,
        interface: &str,
        name: &str,
        set: &IdlFragmentSet,
        found: Option<Vec<Member>>,
    ) -> EtchResult<ResolvedMember> {
        let member = found
            .and_then(|m| m.into_iter().next())
            .ok_or_else(|| EtchError::unknown_member(interface, name))?;
        let interface_secure = set
            .main_interface()
            .is_some_and(|i| i.ext_attrs.iter().any(is_secure_context_attr));
        Ok(ResolvedMember {
            is_secure_context: interface_secure || has_security_context(&member),
            member,
        })
    }

    /// Resolve the `on{event}` handler and its event interface
    pub async fn resolve_event(&self, interface: &str, event: &str) -> EtchResult<EventData> {
        let set = self.fragments(interface).await?;
        let handler_name = format!("{EVENT_HANDLER_PREFIX}{event}");
        let named = has_name(&handler_name);
        let found = extract(&set, &[&is_event_handler, &named]);
        let Some(handler) = found.and_then(|m| m.into_iter().next()) else {
            return Err(EtchError::unknown_event(interface, event));
        };

        let interface_secure = set
            .main_interface()
            .is_some_and(|i| i.ext_attrs.iter().any(is_secure_context_attr));
        let is_secure_context = interface_secure || has_security_context(&handler);

        let tables = self.registry.tables().await?;
        let event_interface = tables
            .events
            .find(event, interface)
            .and_then(|e| e.interface.clone());

        let mut data = EventData {
            handler,
            is_secure_context,
            event_interface: event_interface.clone(),
            parent_event_interface: None,
            event_properties: vec![],
        };

        match event_interface.as_deref() {
            None => {
                debug!("No events table entry for {} on {}", event, interface);
            }
            Some(BASE_EVENT) => {}
            Some(name) => {
                let (_, event_set) = self.registry.parsed_idl(name).await?;
                data.parent_event_interface = event_set
                    .main_interface()
                    .and_then(|i| i.inheritance.clone());
                data.event_properties = self
                    .property_entries(extract(&event_set, &[&is_attribute, &not(is_static)]))
                    .await
                    .unwrap_or_default();
            }
        }

        Ok(data)
    }

    /// Members a caller can ask pages for
    pub async fn member_index(&self, interface: &str) -> EtchResult<MemberIndex> {
        let set = self.fragments(interface).await?;
        let not_handler = not(is_event_handler);

        let entry = |m: &Member| IndexEntry {
            name: m.name_or_empty().to_string(),
            is_static: is_static(m),
        };
        let properties = extract(&set, &[&is_attribute, &is_named, &not_handler])
            .unwrap_or_default()
            .iter()
            .map(entry)
            .collect();
        let methods = extract(&set, &[&is_operation, &is_named])
            .unwrap_or_default()
            .iter()
            .map(entry)
            .collect();
        let events = extract(&set, &[&is_event_handler])
            .unwrap_or_default()
            .iter()
            .filter_map(|m| event_name(m).map(str::to_string))
            .collect();

        Ok(MemberIndex {
            properties,
            has_constructor: extract(&set, &[&is_constructor]).is_some(),
            methods,
            events,
        })
    }

    /// First group whose interface list contains `interface`
    pub async fn group_for(&self, interface: &str) -> EtchResult<Option<String>> {
        let tables = self.registry.tables().await?;
        Ok(tables.group_data.group_for(interface).map(str::to_string))
    }
}
