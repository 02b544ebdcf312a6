//! `uidoc init` command - Initialize a new uidoc site

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::site::{Site, SiteError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Skip the sample Article schema, template and example
    #[arg(long)]
    pub bare: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let site = match Site::init(&path) {
        Ok(site) => site,
        Err(SiteError::AlreadyExists(path)) => {
            println!(
                "{} uidoc site already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            return Ok(());
        }
        Err(e) => return Err(e).into_diagnostic(),
    };

    if !args.bare {
        write_sample(&site)?;
    }

    println!(
        "{} Initialized uidoc site at {}",
        style("✓").green(),
        style(site.root().display()).cyan()
    );
    println!();
    println!("Next steps:");
    println!(
        "  {} Browse the documentation locally",
        style("uidoc serve").yellow()
    );
    println!(
        "  {} List the schema catalogue",
        style("uidoc schema list").yellow()
    );
    println!(
        "  {} Export a static site",
        style("uidoc generate").yellow()
    );

    Ok(())
}

/// Write a minimal working catalogue so a fresh site renders something
fn write_sample(site: &Site) -> Result<()> {
    std::fs::write(site.schemas_dir().join("Article.json"), SAMPLE_SCHEMA)
        .into_diagnostic()?;
    std::fs::write(
        site.i18n_dir().join("en").join("Article.json"),
        SAMPLE_I18N,
    )
    .into_diagnostic()?;
    std::fs::write(site.templates_dir().join("Article.tpl"), SAMPLE_TEMPLATE)
        .into_diagnostic()?;
    std::fs::write(site.examples_dir().join("Article.json"), SAMPLE_EXAMPLE)
        .into_diagnostic()?;
    Ok(())
}

const SAMPLE_SCHEMA: &str = r#"{
    "@type": "Article",
    "@topic": "Content",
    "title": "string",
    "body": "string"
}
"#;

const SAMPLE_I18N: &str = r#"{
    "@name": "Article",
    "@description": "A basic text article",
    "title": { "@name": "Title", "@description": "Headline text" },
    "body": { "@name": "Body", "@description": "Main article text" }
}
"#;

const SAMPLE_TEMPLATE: &str = r#"<article class="article">
    <h1 class="article__title">{{ title }}</h1>
    <div class="article__body">{{ body }}</div>
</article>
"#;

const SAMPLE_EXAMPLE: &str = r#"{
    "@type": "Article",
    "title": "Hello world",
    "body": "This is an example article module."
}
"#;
