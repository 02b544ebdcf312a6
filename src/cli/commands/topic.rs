//! `uidoc topic` commands - derived topic listing

use miette::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::GlobalOpts;

use super::{open_site, report_failures, Snapshot};

#[derive(clap::Subcommand, Debug)]
pub enum TopicCommands {
    /// List topics with their member types
    List,
}

pub fn run(cmd: TopicCommands, global: &GlobalOpts) -> Result<()> {
    let site = open_site(global)?;
    let snapshot = Snapshot::load(&site)?;
    report_failures(&snapshot, global);

    match cmd {
        TopicCommands::List => list(&snapshot),
    }
}

fn list(snapshot: &Snapshot) -> Result<()> {
    if snapshot.registry.topics().is_empty() {
        println!("No topics found");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Topic", "Types"]);

    for topic in snapshot.registry.topics() {
        let types: Vec<&str> = snapshot
            .registry
            .iter()
            .filter(|schema| schema.topics().contains(&topic.name))
            .map(|schema| schema.ty())
            .collect();
        builder.push_record([topic.id.to_string(), topic.name.clone(), types.join(", ")]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
