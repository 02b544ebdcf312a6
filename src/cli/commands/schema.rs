//! `uidoc schema` commands - catalogue introspection

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::GlobalOpts;
use crate::compose::compose;
use crate::core::Config;

use super::{open_site, report_failures, resolve_language, Snapshot};

#[derive(clap::Subcommand, Debug)]
pub enum SchemaCommands {
    /// List every schema in the catalogue
    List(ListArgs),

    /// Show one schema's composed documentation data
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list schemas carrying this topic label
    #[arg(long, short = 't')]
    pub topic: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Schema type name
    pub ty: String,

    /// Print the merged schema record as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub fn run(cmd: SchemaCommands, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;
    let snapshot = Snapshot::load(&site)?;
    report_failures(&snapshot, global);

    match cmd {
        SchemaCommands::List(args) => list(args, &snapshot),
        SchemaCommands::Show(args) => {
            let config = Config::load(Some(&site));
            let language = resolve_language(global, &config);
            show(args, &snapshot, &language)
        }
    }
}

fn list(args: ListArgs, snapshot: &Snapshot) -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(["Type", "Topics", "Parent", "Template", "Example"]);

    let mut count = 0usize;
    for schema in snapshot.registry.iter() {
        if let Some(topic) = &args.topic {
            if !schema.topics().contains(topic) {
                continue;
            }
        }
        builder.push_record([
            schema.ty().to_string(),
            schema.topics().join(", "),
            schema.parent().unwrap_or("-").to_string(),
            yes_no(snapshot.templates.get(schema.ty()).is_some()),
            yes_no(snapshot.examples.has(schema.ty())),
        ]);
        count += 1;
    }

    if count == 0 {
        println!("No schemas found");
        return Ok(());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
    println!("{count} schema(s)");
    Ok(())
}

fn show(args: ShowArgs, snapshot: &Snapshot, language: &str) -> Result<()> {
    if args.json {
        let schema = snapshot.registry.get(&args.ty).into_diagnostic()?;
        println!(
            "{}",
            serde_json::to_string_pretty(schema.record()).into_diagnostic()?
        );
        return Ok(());
    }

    let view = compose(&snapshot.registry, &snapshot.examples, &args.ty, language)
        .into_diagnostic()?;

    println!("{}", style(&view.name).bold());
    println!("{}", view.description);
    println!();

    if view.has_properties {
        let mut builder = Builder::default();
        builder.push_record(["Property", "Name", "Description"]);
        for property in &view.properties {
            builder.push_record([&property.key, &property.name, &property.description]);
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        println!("{table}");
    }

    if view.has_options {
        let mut builder = Builder::default();
        builder.push_record(["Option", "Name", "Description"]);
        for option in &view.options {
            builder.push_record([&option.key, &option.name, &option.description]);
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        println!("{table}");
    }

    if view.has_children {
        println!("Children: {}", view.children.join(", "));
    }
    if view.has_example {
        println!("Example: available");
    }

    Ok(())
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "-" }.to_string()
}
