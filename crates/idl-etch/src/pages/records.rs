//! Page records
//!
//! The data handed to templates. Field names serialize in camelCase and
//! absent values serialize as `null` so templates can test for them.

use crate::resolver::{InterfaceData, MethodEntry, PropertyEntry};
use serde::{Deserialize, Serialize};

/// Interface overview page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfacePage {
    pub interface_name: String,
    pub is_experimental: bool,
    pub group_name: Option<String>,
    pub is_secure_context: bool,
    pub has_constructor: bool,
    pub static_properties: Option<Vec<PropertyEntry>>,
    pub properties: Option<Vec<PropertyEntry>>,
    pub static_methods: Option<Vec<MethodEntry>>,
    pub methods: Option<Vec<MethodEntry>>,
    pub event_names: Vec<String>,
    pub parent_name: Option<String>,
    pub parent_static_properties: Option<Vec<PropertyEntry>>,
    pub parent_properties: Option<Vec<PropertyEntry>>,
    pub parent_static_methods: Option<Vec<MethodEntry>>,
    pub parent_methods: Option<Vec<MethodEntry>>,
}

impl InterfacePage {
    pub fn new(data: InterfaceData, group_name: Option<String>, is_experimental: bool) -> Self {
        let parent = data.parent_members.unwrap_or_default();
        Self {
            interface_name: data.name,
            is_experimental,
            group_name,
            is_secure_context: data.is_secure_context,
            has_constructor: data.has_constructor,
            static_properties: data.members.static_properties,
            properties: data.members.properties,
            static_methods: data.members.static_methods,
            methods: data.members.methods,
            event_names: data.event_names,
            parent_name: data.parent_name,
            parent_static_properties: parent.static_properties,
            parent_properties: parent.properties,
            parent_static_methods: parent.static_methods,
            parent_methods: parent.methods,
        }
    }
}

/// Which member template a page uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Property,
    Method,
    Constructor,
}

impl PageKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            PageKind::Property => "property",
            PageKind::Method => "method",
            PageKind::Constructor => "constructor",
        }
    }
}

/// Operation or constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterEntry {
    pub name: String,
    pub formatted_type: String,
    pub optional: bool,
}

/// Property, method or constructor page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPage {
    pub interface_name: String,
    /// The interface name for constructors
    pub member_name: String,
    pub is_experimental: bool,
    pub group_name: Option<String>,
    pub is_static: bool,
    pub is_constructor: bool,
    pub is_secure_context: bool,
    /// `None` for properties and for operations without arguments
    pub parameters: Option<Vec<ParameterEntry>>,
    /// `None` for properties and `undefined` returns
    pub return_type: Option<String>,
    pub page_kind: PageKind,
    pub property_type: Option<String>,
    pub is_readonly: bool,
}

/// Event page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub interface_name: String,
    pub event_short_name: String,
    pub is_experimental: bool,
    pub group_name: Option<String>,
    pub is_secure_context: bool,
    /// `None` when the events table does not list the event for this target
    pub event_interface_name: Option<String>,
    pub parent_event_interface_name: Option<String>,
    pub event_properties: Vec<PropertyEntry>,
}

/// Any page record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageData {
    Interface(InterfacePage),
    Member(MemberPage),
    Event(EventPage),
}

impl PageData {
    /// Name of the template that renders this record
    pub fn template_name(&self) -> &'static str {
        match self {
            PageData::Interface(_) => "interface",
            PageData::Member(page) => page.page_kind.template_name(),
            PageData::Event(_) => "event",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MemberGroups;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_absent_parent_serializes_as_null() {
        let data = InterfaceData {
            name: "EventTarget".into(),
            is_secure_context: false,
            has_constructor: true,
            members: MemberGroups::default(),
            event_names: vec![],
            parent_name: None,
            parent_members: None,
        };
        let page = InterfacePage::new(data, Some("DOM".into()), false);
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["interfaceName"], json!("EventTarget"));
        assert_eq!(value["groupName"], json!("DOM"));
        for key in [
            "parentName",
            "parentStaticProperties",
            "parentProperties",
            "parentStaticMethods",
            "parentMethods",
            "staticProperties",
        ] {
            assert!(value.get(key).is_some(), "{key} missing");
            assert_eq!(value[key], json!(null), "{key}");
        }
    }

    #[test]
    fn test_template_names() {
        let event = PageData::Event(EventPage {
            interface_name: "Element".into(),
            event_short_name: "click".into(),
            is_experimental: false,
            group_name: None,
            is_secure_context: false,
            event_interface_name: None,
            parent_event_interface_name: None,
            event_properties: vec![],
        });
        assert_eq!(event.template_name(), "event");
        assert_eq!(
            serde_json::to_value(&event).unwrap()["eventInterfaceName"],
            json!(null)
        );
        assert_eq!(PageKind::Constructor.template_name(), "constructor");
        assert_eq!(serde_json::to_value(PageKind::Method).unwrap(), json!("method"));
    }
}
