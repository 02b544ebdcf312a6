//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, generate::GenerateArgs, init::InitArgs, page::PageCommands,
    schema::SchemaCommands, serve::ServeArgs, topic::TopicCommands,
};

#[derive(Parser)]
#[command(name = "uidoc")]
#[command(author, version, about = "UI schema documentation toolkit")]
#[command(
    long_about = "Renders a catalogue of UI schema definitions into browsable documentation pages and composable page previews."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Site root (default: walk up looking for uidoc.yaml or schemas/)
    #[arg(long, global = true)]
    pub site: Option<PathBuf>,

    /// Language for rendered pages (default: site config, then "en")
    #[arg(long, short = 'l', global = true)]
    pub language: Option<String>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new uidoc site
    Init(InitArgs),

    /// Run the documentation server
    Serve(ServeArgs),

    /// Generate a static export of every page
    Generate(GenerateArgs),

    /// Schema catalogue introspection
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Topic listing
    #[command(subcommand)]
    Topic(TopicCommands),

    /// Compose pages from module instances
    #[command(subcommand)]
    Page(PageCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}
