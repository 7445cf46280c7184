//! Command line: generate | list | groups
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use idl_etch::{write_pages, EtchConfig, GeneratedPage, PageGenerator, PageRequest};
use tracing::info;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate MDN documentation skeletons for Web API interfaces from webref IDL
#[derive(Parser, Debug)]
#[command(name = "idl-etch", version)]
pub struct CommandLineInterface {
    #[command(flatten)]
    registry: RegistrySettings,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate an interface page, a member page, or a whole interface tree
    Generate(GenerateArgs),
    /// list the documentable members of an interface
    List(ListArgs),
    /// list the API groups
    Groups,
}

#[derive(Args, Debug, Clone)]
struct RegistrySettings {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// local registry mirror to read instead of fetching over HTTP
    #[arg(long, global = true)]
    mirror: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// interface name, e.g. HTMLElement
    interface: String,

    /// document a property or method instead of the interface
    #[arg(long, conflicts_with_all = ["constructor", "event"])]
    member: Option<String>,

    /// the member is static
    #[arg(long = "static", requires = "member")]
    is_static: bool,

    /// document the constructor
    #[arg(long, conflicts_with = "event")]
    constructor: bool,

    /// document an event (name without the `on` prefix)
    #[arg(long)]
    event: Option<String>,

    /// API group; looked up in GroupData when omitted
    #[arg(long)]
    group: Option<String>,

    /// mark pages experimental
    #[arg(long, default_value_t = false)]
    experimental: bool,

    /// also generate one page per constructor, member and event
    #[arg(long, conflicts_with_all = ["member", "constructor", "event"])]
    recursive: bool,

    /// output directory (stdout for single pages if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// directory with template overrides
    #[arg(long)]
    templates: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ListArgs {
    /// interface name
    interface: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub async fn execute(self) -> Result<()> {
        let mut config = self.registry.load_config()?;
        match self.cmd {
            Command::Generate(args) => {
                if let Some(dir) = &args.templates {
                    config = config.with_templates_dir(dir);
                }
                if let Some(dir) = &args.output {
                    config = config.with_output_dir(dir);
                }
                args.execute(config).await
            }
            Command::List(args) => args.execute(config).await,
            Command::Groups => list_groups(config).await,
        }
    }
}

impl RegistrySettings {
    fn load_config(&self) -> Result<EtchConfig> {
        let config = match &self.config {
            Some(path) => EtchConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => EtchConfig::default(),
        };
        Ok(match &self.mirror {
            Some(dir) => config.with_mirror_dir(dir),
            None => config,
        })
    }
}

impl GenerateArgs {
    fn request(&self) -> PageRequest {
        let mut request =
            PageRequest::interface(&self.interface).as_experimental(self.experimental);
        if let Some(group) = &self.group {
            request = request.with_group(group);
        }
        if let Some(member) = &self.member {
            request = request.for_member(member, self.is_static);
        } else if self.constructor {
            request = request.for_constructor();
        } else if let Some(event) = &self.event {
            request = request.for_event(event);
        }
        request
    }

    async fn execute(&self, config: EtchConfig) -> Result<()> {
        let root = interface_dir(&config.output_dir, &self.interface);
        let extension = config.file_extension.clone();
        let generator = PageGenerator::from_config(config)?;
        let request = self.request();

        if self.recursive {
            let pages = generator
                .generate_recursive(&request)
                .await
                .with_context(|| format!("failed to generate pages for {}", self.interface))?;
            let written = write_pages(&root, &pages).await?;
            info!("Wrote {} pages under {}", written.len(), root.display());
            return Ok(());
        }

        let content = generator.generate(&request).await?;
        if self.output.is_none() {
            println!("{content}");
            return Ok(());
        }
        let page = GeneratedPage {
            relative_path: request.relative_path(&extension),
            content,
        };
        let path = page.write_to(&root).await?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

impl ListArgs {
    async fn execute(&self, config: EtchConfig) -> Result<()> {
        let generator = PageGenerator::from_config(config)?;
        let index = generator.resolver().member_index(&self.interface).await?;

        println!("{}", self.interface);
        if index.has_constructor {
            println!("  constructor  {}()", self.interface);
        }
        for property in &index.properties {
            let marker = if property.is_static { " (static)" } else { "" };
            println!("  property     {}{marker}", property.name);
        }
        for method in &index.methods {
            let marker = if method.is_static { " (static)" } else { "" };
            println!("  method       {}(){marker}", method.name);
        }
        for event in &index.events {
            println!("  event        {event}");
        }
        Ok(())
    }
}

async fn list_groups(config: EtchConfig) -> Result<()> {
    let generator = PageGenerator::from_config(config)?;
    let tables = generator.resolver().registry().tables().await?;
    for name in tables.group_data.names() {
        println!("{name}");
    }
    Ok(())
}

/// Directory the pages of `interface` are written to
fn interface_dir(output: &Path, interface: &str) -> PathBuf {
    output.join(interface.to_lowercase())
}
