//! Page rendering
//!
//! Handlebars templates turn page records into Markdown. Built-in templates
//! are compiled in; a directory of `<name>.md.hbs` files can override any of
//! them. Output is never HTML-escaped since it is Markdown with embedded
//! KumaScript macros.

mod helpers;

use crate::config::EtchConfig;
use crate::diagnostics::{EtchError, EtchResult};
use crate::pages::PageData;
use handlebars::Handlebars;
use std::path::Path;
use tracing::debug;

/// Built-in templates, by name
pub const TEMPLATES: &[(&str, &str)] = &[
    ("interface", include_str!("../../templates/interface.md.hbs")),
    ("property", include_str!("../../templates/property.md.hbs")),
    ("method", include_str!("../../templates/method.md.hbs")),
    ("constructor", include_str!("../../templates/constructor.md.hbs")),
    ("event", include_str!("../../templates/event.md.hbs")),
];

/// File name of the override for template `name`
pub fn template_file_name(name: &str) -> String {
    format!("{name}.md.hbs")
}

/// Renders page records to text
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Renderer with the built-in templates
    pub fn new() -> EtchResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        helpers::register(&mut registry);
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    /// Built-in templates, replaced by any matching files in `dir`
    pub fn with_overrides(dir: &Path) -> EtchResult<Self> {
        if !dir.is_dir() {
            return Err(EtchError::FileNotFound(dir.to_path_buf()));
        }
        let mut renderer = Self::new()?;
        for (name, _) in TEMPLATES {
            let path = dir.join(template_file_name(name));
            if path.is_file() {
                debug!("Using template override {}", path.display());
                let source = std::fs::read_to_string(&path)?;
                renderer.registry.register_template_string(name, source)?;
            }
        }
        Ok(renderer)
    }

    pub fn from_config(config: &EtchConfig) -> EtchResult<Self> {
        match &config.templates_dir {
            Some(dir) => Self::with_overrides(dir),
            None => Self::new(),
        }
    }

    /// Render a page record with its template
    pub fn render(&self, page: &PageData) -> EtchResult<String> {
        Ok(self.registry.render(page.template_name(), page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{EventPage, InterfacePage, MemberPage, PageKind, ParameterEntry};
    use crate::resolver::{MethodEntry, PropertyEntry};
    use tempfile::TempDir;

    fn node_page() -> InterfacePage {
        InterfacePage {
            interface_name: "Node".into(),
            is_experimental: false,
            group_name: Some("DOM".into()),
            is_secure_context: false,
            has_constructor: false,
            static_properties: Some(vec![PropertyEntry {
                name: "ELEMENT_NODE".into(),
                formatted_type: "integer".into(),
                is_readonly: true,
                is_secure_context: false,
            }]),
            properties: Some(vec![PropertyEntry {
                name: "parentNode".into(),
                formatted_type: "{{domxref(\"Node\")}}".into(),
                is_readonly: true,
                is_secure_context: false,
            }]),
            static_methods: None,
            methods: Some(vec![MethodEntry {
                name: "appendChild".into(),
                is_secure_context: false,
            }]),
            event_names: vec![],
            parent_name: Some("EventTarget".into()),
            parent_static_properties: None,
            parent_properties: None,
            parent_static_methods: None,
            parent_methods: Some(vec![MethodEntry {
                name: "addEventListener".into(),
                is_secure_context: false,
            }]),
        }
    }

    #[test]
    fn test_interface_template() {
        let renderer = PageRenderer::new().unwrap();
        let text = renderer.render(&PageData::Interface(node_page())).unwrap();

        assert!(text.contains("title: Node\n"));
        assert!(text.contains("{{APIRef(\"DOM\")}}"));
        assert!(text.contains("- {{domxref(\"Node.ELEMENT_NODE\")}} {{ReadOnlyInline}}"));
        assert!(text.contains("  - : {{domxref(\"Node\")}}"));
        assert!(text.contains("- {{domxref(\"Node.appendChild()\")}}"));
        assert!(text.contains("_Also inherits methods from its parent, {{domxref(\"EventTarget\")}}._"));
        assert!(!text.contains("## Constructor"));
        assert!(!text.contains("## Events"));
        assert!(!text.contains("&quot;"));
    }

    #[test]
    fn test_experimental_and_secure_markers() {
        let renderer = PageRenderer::new().unwrap();
        let mut page = node_page();
        page.is_experimental = true;
        page.is_secure_context = true;
        page.has_constructor = true;
        let text = renderer.render(&PageData::Interface(page)).unwrap();
        assert!(text.contains("  - experimental"));
        assert!(text.contains("{{SecureContext_Header}}"));
        assert!(text.contains("{{SeeCompatTable}}"));
        assert!(text.contains("- {{domxref(\"Node.Node()\")}}"));
    }

    #[test]
    fn test_method_template() {
        let renderer = PageRenderer::new().unwrap();
        let page = MemberPage {
            interface_name: "Node".into(),
            member_name: "appendChild".into(),
            is_experimental: false,
            group_name: None,
            is_static: false,
            is_constructor: false,
            is_secure_context: false,
            parameters: Some(vec![ParameterEntry {
                name: "node".into(),
                formatted_type: "{{domxref(\"Node\")}}".into(),
                optional: false,
            }]),
            return_type: Some("{{domxref(\"Node\")}}".into()),
            page_kind: PageKind::Method,
            property_type: None,
            is_readonly: false,
        };
        let text = renderer.render(&PageData::Member(page)).unwrap();
        assert!(text.contains("title: \"Node: appendChild() method\""));
        assert!(text.contains("page-type: web-api-instance-method"));
        assert!(text.contains("{{APIRef}}"));
        assert!(text.contains("- `node`\n  - : {{domxref(\"Node\")}}"));
        assert!(text.contains("### Return value\n\n{{domxref(\"Node\")}}"));
    }

    #[test]
    fn test_event_template_unresolved() {
        let renderer = PageRenderer::new().unwrap();
        let page = EventPage {
            interface_name: "HTMLElement".into(),
            event_short_name: "click".into(),
            is_experimental: false,
            group_name: Some("HTML DOM".into()),
            is_secure_context: false,
            event_interface_name: None,
            parent_event_interface_name: None,
            event_properties: vec![],
        };
        let text = renderer.render(&PageData::Event(page)).unwrap();
        assert!(text.contains("title: \"HTMLElement: click event\""));
        assert!(text.contains("slug: Web/API/HTMLElement/click_event"));
        assert!(text.contains("A generic {{domxref(\"Event\")}}."));
    }

    #[test]
    fn test_template_override() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(template_file_name("interface")),
            "# {{interfaceName}} ({{groupName}})",
        )
        .unwrap();
        let renderer = PageRenderer::with_overrides(dir.path()).unwrap();
        let text = renderer.render(&PageData::Interface(node_page())).unwrap();
        assert_eq!(text, "# Node (DOM)");
    }

    #[test]
    fn test_missing_override_dir() {
        let err = PageRenderer::with_overrides(Path::new("/definitely/not/here")).err();
        assert!(matches!(err, Some(EtchError::FileNotFound(_))));
    }

    #[test]
    fn test_broken_override_is_template_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("event.md.hbs"), "{{#if isSecureContext}}unclosed").unwrap();
        let err = PageRenderer::with_overrides(dir.path()).err();
        assert!(matches!(err, Some(EtchError::Template(_))));
    }
}
