//! `uidoc page` commands - compose pages from module instances
//!
//! Each invocation opens the named page, performs one builder transition
//! and persists the result, so the stored page is always consistent with
//! what the last command reported.

use console::style;
use dialoguer::Confirm;
use miette::{miette, IntoDiagnostic, Result};
use serde_json::Value;

use crate::builder::{FileStore, PageBuilder, PageStore};
use crate::cli::GlobalOpts;
use crate::core::{Config, Site};
use crate::render::Renderer;

use super::{open_site, report_failures, Snapshot};

#[derive(clap::Subcommand, Debug)]
pub enum PageCommands {
    /// List saved pages
    List,

    /// Create a new empty page
    Add(NameArgs),

    /// Delete a saved page
    Remove(RemoveArgs),

    /// Show a page's modules and statistics
    Show(NameArgs),

    /// Append a type's example module to a page
    Drop(DropArgs),

    /// Edit one module's JSON
    Edit(EditArgs),

    /// Remove one module from a page
    RmModule(ModuleArgs),

    /// Print one module's standalone preview document
    Preview(PreviewArgs),
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Page name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Page name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct DropArgs {
    /// Page name
    pub page: String,

    /// Schema type whose example payload to append
    pub ty: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Page name
    pub page: String,

    /// Zero-based module index
    pub index: usize,

    /// Replacement JSON (skips the editor)
    #[arg(long)]
    pub json: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ModuleArgs {
    /// Page name
    pub page: String,

    /// Zero-based module index
    pub index: usize,
}

#[derive(clap::Args, Debug)]
pub struct PreviewArgs {
    /// Page name
    pub page: String,

    /// Zero-based module index
    pub index: usize,

    /// Strip newlines for single-line embedding
    #[arg(long)]
    pub inline: bool,
}

pub fn run(cmd: PageCommands, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;
    let snapshot = Snapshot::load(&site)?;
    report_failures(&snapshot, global);

    let renderer = Renderer::new(&snapshot.templates).into_diagnostic()?;
    let store = FileStore::for_site(&site);

    match cmd {
        PageCommands::List => list(&store),
        PageCommands::Add(args) => add(&store, &renderer, &snapshot, &args.name),
        PageCommands::Remove(args) => remove(&store, &renderer, &snapshot, args),
        PageCommands::Show(args) => show(&store, &renderer, &snapshot, &args.name),
        PageCommands::Drop(args) => drop_module(&store, &renderer, &snapshot, args),
        PageCommands::Edit(args) => edit(&site, &store, &renderer, &snapshot, args),
        PageCommands::RmModule(args) => rm_module(&store, &renderer, &snapshot, args),
        PageCommands::Preview(args) => preview(&store, &renderer, &snapshot, args),
    }
}

fn open<'a>(
    store: &'a FileStore,
    renderer: &'a Renderer,
    snapshot: &'a Snapshot,
    page: &str,
) -> Result<PageBuilder<'a>> {
    PageBuilder::open(
        store,
        renderer,
        &snapshot.registry,
        &snapshot.examples,
        page,
    )
    .into_diagnostic()
}

fn list(store: &FileStore) -> Result<()> {
    let names = store.list().into_diagnostic()?;
    if names.is_empty() {
        println!("No saved pages");
        return Ok(());
    }
    for name in names {
        let modules = store.load(&name).into_diagnostic()?.unwrap_or_default();
        println!("{}  ({} module(s))", style(&name).bold(), modules.len());
    }
    Ok(())
}

fn add(
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    name: &str,
) -> Result<()> {
    if store.load(name).into_diagnostic()?.is_some() {
        return Err(miette!("page \"{name}\" already exists"));
    }
    let mut builder = open(store, renderer, snapshot, name)?;
    builder.add_page(name).into_diagnostic()?;
    println!("{} Created page {}", style("✓").green(), style(name).bold());
    Ok(())
}

fn remove(
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    args: RemoveArgs,
) -> Result<()> {
    if store.load(&args.name).into_diagnostic()?.is_none() {
        return Err(miette!("page \"{}\" does not exist", args.name));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete page \"{}\"?", args.name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    let mut builder = open(store, renderer, snapshot, &args.name)?;
    builder.remove_page(&args.name).into_diagnostic()?;
    println!(
        "{} Removed page {}",
        style("✓").green(),
        style(&args.name).bold()
    );
    Ok(())
}

fn show(
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    name: &str,
) -> Result<()> {
    let builder = open(store, renderer, snapshot, name)?;

    println!("{}  ({})", style(name).bold(), builder.stats());
    if builder.is_empty() {
        return Ok(());
    }

    println!();
    for (index, module) in builder.modules().iter().enumerate() {
        let ty = module.get("@type").and_then(Value::as_str).unwrap_or("?");
        let marker = if renderer.has_template(ty) {
            style("✓").green()
        } else {
            style("!").yellow()
        };
        println!("  {index}: {marker} {ty}");
    }
    Ok(())
}

fn drop_module(
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    args: DropArgs,
) -> Result<()> {
    let mut builder = open(store, renderer, snapshot, &args.page)?;

    if builder.add_module(&args.ty).into_diagnostic()? {
        println!(
            "{} Added {} to {} ({})",
            style("✓").green(),
            style(&args.ty).bold(),
            style(&args.page).bold(),
            builder.stats()
        );
    } else {
        println!(
            "{} No example for \"{}\", nothing added",
            style("!").yellow(),
            args.ty
        );
    }
    Ok(())
}

fn edit(
    site: &Site,
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    args: EditArgs,
) -> Result<()> {
    let mut builder = open(store, renderer, snapshot, &args.page)?;
    builder.select(args.index).into_diagnostic()?;

    let replacement = match args.json {
        Some(json) => json,
        None => edit_in_editor(site, &builder)?,
    };

    if !builder.edit_active(&replacement).into_diagnostic()? {
        return Err(miette!("invalid JSON; the page was left unchanged"));
    }

    println!(
        "{} Updated module {} of {}",
        style("✓").green(),
        args.index,
        style(&args.page).bold()
    );
    Ok(())
}

/// Round-trip the active module's JSON through the configured editor
fn edit_in_editor(site: &Site, builder: &PageBuilder) -> Result<String> {
    let inspector = builder
        .inspect()
        .ok_or_else(|| miette!("no module is selected"))?;

    let path = std::env::temp_dir().join(format!("uidoc-edit-{}.json", std::process::id()));
    std::fs::write(&path, &inspector.json).into_diagnostic()?;

    let config = Config::load(Some(site));
    let status = config.run_editor(&path).into_diagnostic()?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(miette!("editor exited with an error"));
    }

    let edited = std::fs::read_to_string(&path).into_diagnostic()?;
    let _ = std::fs::remove_file(&path);
    Ok(edited)
}

fn rm_module(
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    args: ModuleArgs,
) -> Result<()> {
    let mut builder = open(store, renderer, snapshot, &args.page)?;
    builder.select(args.index).into_diagnostic()?;
    builder.remove_active().into_diagnostic()?;

    println!(
        "{} Removed module {} from {} ({})",
        style("✓").green(),
        args.index,
        style(&args.page).bold(),
        builder.stats()
    );
    Ok(())
}

fn preview(
    store: &FileStore,
    renderer: &Renderer,
    snapshot: &Snapshot,
    args: PreviewArgs,
) -> Result<()> {
    let builder = open(store, renderer, snapshot, &args.page)?;
    let module = builder
        .modules()
        .get(args.index)
        .ok_or_else(|| miette!("no module at index {}", args.index))?;
    let ty = module
        .get("@type")
        .and_then(Value::as_str)
        .ok_or_else(|| miette!("module {} has no @type", args.index))?;

    let document = if args.inline {
        renderer.render_standalone_inline(ty, module)
    } else {
        renderer.render_standalone(ty, module)
    }
    .into_diagnostic()?;

    println!("{document}");
    Ok(())
}
