//! Page assembly
//!
//! Turns a [`PageRequest`] into a page record, renders it, and in recursive
//! mode fans out to one sub-page per documentable member.

pub mod records;

pub use records::{EventPage, InterfacePage, MemberPage, PageData, PageKind, ParameterEntry};

use crate::config::EtchConfig;
use crate::diagnostics::EtchResult;
use crate::format::LIST_ITEM_DEPTH;
use crate::idl::{Member, MemberKind};
use crate::predicates::is_static;
use crate::registry::SchemaRegistry;
use crate::render::PageRenderer;
use crate::resolver::{InterfaceData, ResolvedMember, Resolver};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Which page of an interface to generate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MemberSelector {
    /// The interface overview
    Interface,
    Constructor,
    Member { name: String, is_static: bool },
    Event { name: String },
}

impl MemberSelector {
    /// Path of the page relative to the interface's directory
    pub fn relative_path(&self, interface: &str, extension: &str) -> String {
        match self {
            MemberSelector::Interface => format!("index.{extension}"),
            MemberSelector::Constructor => {
                format!("{}/index.{extension}", interface.to_lowercase())
            }
            MemberSelector::Member { name, .. } => {
                format!("{}/index.{extension}", name.to_lowercase())
            }
            MemberSelector::Event { name } => {
                format!("{}_event/index.{extension}", name.to_lowercase())
            }
        }
    }
}

/// An explicit generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub interface: String,
    pub selector: MemberSelector,
    /// Looked up in the group table when absent
    pub group: Option<String>,
    pub experimental: bool,
}

impl PageRequest {
    /// Request the overview page of `interface`
    pub fn interface(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            selector: MemberSelector::Interface,
            group: None,
            experimental: false,
        }
    }

    pub fn with_selector(mut self, selector: MemberSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn for_constructor(self) -> Self {
        self.with_selector(MemberSelector::Constructor)
    }

    pub fn for_member(self, name: impl Into<String>, is_static: bool) -> Self {
        self.with_selector(MemberSelector::Member {
            name: name.into(),
            is_static,
        })
    }

    pub fn for_event(self, name: impl Into<String>) -> Self {
        self.with_selector(MemberSelector::Event { name: name.into() })
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn as_experimental(mut self, experimental: bool) -> Self {
        self.experimental = experimental;
        self
    }

    /// Path of the generated page relative to the interface's directory
    pub fn relative_path(&self, extension: &str) -> String {
        self.selector.relative_path(&self.interface, extension)
    }
}

/// One file of generated output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPage {
    pub relative_path: String,
    pub content: String,
}

impl GeneratedPage {
    /// Write under `root`, creating parent directories
    pub async fn write_to(&self, root: &Path) -> EtchResult<PathBuf> {
        let path = self
            .relative_path
            .split('/')
            .fold(root.to_path_buf(), |acc, seg| acc.join(seg));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &self.content).await?;
        Ok(path)
    }
}

/// Write every page under `root`
pub async fn write_pages(root: &Path, pages: &[GeneratedPage]) -> EtchResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        written.push(page.write_to(root).await?);
    }
    Ok(written)
}

/// Assembles and renders pages
pub struct PageGenerator {
    resolver: Resolver,
    renderer: PageRenderer,
    extension: String,
}

impl PageGenerator {
    pub fn new(resolver: Resolver, renderer: PageRenderer) -> Self {
        Self {
            resolver,
            renderer,
            extension: "md".to_string(),
        }
    }

    /// Registry and renderer as the configuration describes them
    pub fn from_config(config: EtchConfig) -> EtchResult<Self> {
        let renderer = PageRenderer::from_config(&config)?;
        let extension = config.file_extension.clone();
        let registry = Arc::new(SchemaRegistry::from_config(config)?);
        Ok(Self::new(Resolver::new(registry), renderer).with_extension(extension))
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    async fn group_name(&self, request: &PageRequest) -> EtchResult<Option<String>> {
        match &request.group {
            Some(group) => Ok(Some(group.clone())),
            None => self.resolver.group_for(&request.interface).await,
        }
    }

    /// Build the page record for `request`
    pub async fn assemble(&self, request: &PageRequest) -> EtchResult<PageData> {
        let group = self.group_name(request).await?;
        let interface = request.interface.as_str();
        let page = match &request.selector {
            MemberSelector::Interface => {
                let data = self.resolver.resolve_interface(interface).await?;
                PageData::Interface(InterfacePage::new(data, group, request.experimental))
            }
            MemberSelector::Constructor => {
                let resolved = self.resolver.resolve_constructor(interface).await?;
                PageData::Member(self.member_page(request, resolved, group).await)
            }
            MemberSelector::Member { name, is_static } => {
                let resolved = self
                    .resolver
                    .resolve_member(interface, name, *is_static)
                    .await?;
                PageData::Member(self.member_page(request, resolved, group).await)
            }
            MemberSelector::Event { name } => {
                let data = self.resolver.resolve_event(interface, name).await?;
                PageData::Event(EventPage {
                    interface_name: interface.to_string(),
                    event_short_name: name.clone(),
                    is_experimental: request.experimental,
                    group_name: group,
                    is_secure_context: data.is_secure_context,
                    event_interface_name: data.event_interface,
                    parent_event_interface_name: data.parent_event_interface,
                    event_properties: data.event_properties,
                })
            }
        };
        Ok(page)
    }

    async fn member_page(
        &self,
        request: &PageRequest,
        resolved: ResolvedMember,
        group_name: Option<String>,
    ) -> MemberPage {
        let member = &resolved.member;
        let formatter = self.resolver.formatter();
        let is_constructor = member.kind == MemberKind::Constructor;

        let parameters = match member.kind {
            MemberKind::Operation | MemberKind::Constructor => {
                let entries = join_all(member.arguments.iter().map(|arg| async {
                    ParameterEntry {
                        name: arg.name.clone(),
                        formatted_type: formatter.format(&arg.idl_type, LIST_ITEM_DEPTH).await,
                        optional: arg.optional,
                    }
                }))
                .await;
                (!entries.is_empty()).then_some(entries)
            }
            _ => None,
        };

        let return_type = match (&member.kind, &member.idl_type) {
            (MemberKind::Operation, Some(ty)) if !ty.is_undefined() => {
                Some(formatter.format(ty, 0).await)
            }
            _ => None,
        };

        let property_type = match (&member.kind, &member.idl_type) {
            (MemberKind::Attribute | MemberKind::Const, Some(ty)) => {
                Some(formatter.format(ty, 0).await)
            }
            _ => None,
        };

        MemberPage {
            interface_name: request.interface.clone(),
            member_name: if is_constructor {
                request.interface.clone()
            } else {
                member.name_or_empty().to_string()
            },
            is_experimental: request.experimental,
            group_name,
            is_static: !is_constructor && is_static(member),
            is_constructor,
            is_secure_context: resolved.is_secure_context,
            parameters,
            return_type,
            page_kind: page_kind(member),
            property_type,
            is_readonly: member.readonly,
        }
    }

    /// Assemble and render one page
    pub async fn generate(&self, request: &PageRequest) -> EtchResult<String> {
        let page = self.assemble(request).await?;
        self.renderer.render(&page)
    }

    /// Generate the overview page of `request.interface` followed by one page
    /// per constructor, static property, property, static method, method and
    /// event, in that order.
    ///
    /// A failing sub-page becomes inline error text in its slot; only a
    /// failure to resolve the interface itself is returned as an error.
    pub async fn generate_recursive(&self, request: &PageRequest) -> EtchResult<Vec<GeneratedPage>> {
        let group = self.group_name(request).await?;
        let root = PageRequest {
            selector: MemberSelector::Interface,
            group: group.clone(),
            ..request.clone()
        };

        let data = self.resolver.resolve_interface(&root.interface).await?;
        let root_content = self
            .renderer
            .render(&PageData::Interface(InterfacePage::new(
                data.clone(),
                group,
                root.experimental,
            )))?;

        let requests: Vec<PageRequest> = sub_selectors(&data)
            .into_iter()
            .map(|selector| root.clone().with_selector(selector))
            .collect();
        info!(
            "Generating {} sub-pages for {}",
            requests.len(),
            root.interface
        );

        let contents = join_all(requests.iter().map(|r| self.generate(r))).await;

        let mut pages = vec![GeneratedPage {
            relative_path: root.relative_path(&self.extension),
            content: root_content,
        }];
        for (sub, content) in requests.iter().zip(contents) {
            let content = content.unwrap_or_else(|e| {
                warn!("Failed to generate {}: {}", sub.relative_path(&self.extension), e);
                format!("**Error:** {e}")
            });
            pages.push(GeneratedPage {
                relative_path: sub.relative_path(&self.extension),
                content,
            });
        }
        Ok(pages)
    }
}

fn page_kind(member: &Member) -> PageKind {
    match member.kind {
        MemberKind::Constructor => PageKind::Constructor,
        MemberKind::Operation => PageKind::Method,
        MemberKind::Attribute | MemberKind::Const | MemberKind::Declaration => PageKind::Property,
    }
}

fn sub_selectors(data: &InterfaceData) -> Vec<MemberSelector> {
    let mut selectors = Vec::new();
    if data.has_constructor {
        selectors.push(MemberSelector::Constructor);
    }

    let member = |is_static: bool| {
        move |name: &String| MemberSelector::Member {
            name: name.clone(),
            is_static,
        }
    };
    let groups = &data.members;
    let property_names = |entries: &Option<Vec<crate::resolver::PropertyEntry>>| {
        entries
            .iter()
            .flatten()
            .map(|e| e.name.clone())
            .collect::<Vec<_>>()
    };
    let method_names = |entries: &Option<Vec<crate::resolver::MethodEntry>>| {
        entries
            .iter()
            .flatten()
            .map(|e| e.name.clone())
            .collect::<Vec<_>>()
    };

    selectors.extend(property_names(&groups.static_properties).iter().map(member(true)));
    selectors.extend(property_names(&groups.properties).iter().map(member(false)));
    selectors.extend(method_names(&groups.static_methods).iter().map(member(true)));
    selectors.extend(method_names(&groups.methods).iter().map(member(false)));
    selectors.extend(
        data.event_names
            .iter()
            .map(|name| MemberSelector::Event { name: name.clone() }),
    );
    selectors
}
