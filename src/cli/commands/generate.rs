//! `uidoc generate` command - static export of every page and feed

use console::style;
use miette::{miette, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::GlobalOpts;
use crate::compose::{compose, ComposeError};
use crate::core::{Config, Site};
use crate::pages::{self, PageRenderer};

use super::{init_tracing, open_site, report_failures, resolve_language, Snapshot};

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Output directory (default: site config "output", then "public")
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Replace the output directory even if it does not look like an export
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    init_tracing(global);

    let site = open_site(global)?;
    let config = Config::load(Some(&site));
    let language = resolve_language(global, &config);

    let snapshot = Snapshot::load(&site)?;
    report_failures(&snapshot, global);

    let output = args
        .output
        .unwrap_or_else(|| site.root().join(&config.output));
    prepare_output(&output, args.force)?;

    let renderer = PageRenderer::new().into_diagnostic()?;
    let mut written = 0usize;

    // Index
    let index = renderer.index(&snapshot.registry).into_diagnostic()?;
    write_file(&output.join("index.html"), index.as_bytes())?;
    written += 1;

    // Per-type documentation page and record endpoint
    let mut skipped = Vec::new();
    for schema in snapshot.registry.iter() {
        let ty = schema.ty();

        let record = serde_json::to_vec_pretty(schema.record()).into_diagnostic()?;
        write_file(&output.join(format!("{ty}.json")), &record)?;
        written += 1;

        match compose(&snapshot.registry, &snapshot.examples, ty, &language) {
            Ok(view) => {
                let html = renderer.schema_page(&view).into_diagnostic()?;
                write_file(&output.join(ty).join("index.html"), html.as_bytes())?;
                written += 1;
            }
            Err(ComposeError::LocalizationMissing { .. }) => {
                skipped.push(ty.to_string());
            }
            Err(error) => return Err(error).into_diagnostic(),
        }
    }

    // Catalogue feeds
    let feeds: [(&str, Vec<u8>); 4] = [
        (
            "schemas.json",
            serde_json::to_vec_pretty(&snapshot.registry.records()).into_diagnostic()?,
        ),
        (
            "templates.json",
            serde_json::to_vec_pretty(&snapshot.templates.to_json()).into_diagnostic()?,
        ),
        (
            "examples.json",
            serde_json::to_vec_pretty(&snapshot.examples.records()).into_diagnostic()?,
        ),
        (
            "topics.json",
            serde_json::to_vec_pretty(&snapshot.registry.topic_names()).into_diagnostic()?,
        ),
    ];
    for (name, body) in feeds {
        write_file(&output.join(name), &body)?;
        written += 1;
    }

    written += export_css(&site, &output)?;

    if !global.quiet {
        println!(
            "{} Generated {} file(s) in {}",
            style("✓").green(),
            written,
            style(output.display()).cyan()
        );
        for ty in &skipped {
            println!(
                "{} {} has no \"{}\" localization, page skipped",
                style("!").yellow(),
                ty,
                language
            );
        }
    }

    Ok(())
}

/// Clear the output directory, refusing to delete a directory that does
/// not look like a previous export unless forced.
fn prepare_output(output: &Path, force: bool) -> Result<()> {
    if output.exists() {
        let looks_like_export =
            output.join("index.html").is_file() || std::fs::read_dir(output)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
        if !looks_like_export && !force {
            return Err(miette!(
                "{} exists and does not look like a previous export; pass --force to replace it",
                output.display()
            ));
        }
        std::fs::remove_dir_all(output).into_diagnostic()?;
    }
    std::fs::create_dir_all(output).into_diagnostic()?;
    Ok(())
}

/// Copy the site stylesheets, backfilling embedded defaults for names
/// the site does not provide
fn export_css(site: &Site, output: &Path) -> Result<usize> {
    let css_out = output.join("css");
    std::fs::create_dir_all(&css_out).into_diagnostic()?;
    let mut written = 0usize;

    let css_dir = site.css_dir();
    if css_dir.is_dir() {
        for entry in WalkDir::new(&css_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&css_dir)
                .into_diagnostic()?;
            let dest = css_out.join(rel);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).into_diagnostic()?;
            }
            std::fs::copy(entry.path(), &dest).into_diagnostic()?;
            written += 1;
        }
    }

    for name in pages::embedded_css_names() {
        let dest = css_out.join(&name);
        if dest.exists() {
            continue;
        }
        if let Some(body) = pages::embedded_css(&name) {
            write_file(&dest, &body)?;
            written += 1;
        }
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(path, contents).into_diagnostic()
}
