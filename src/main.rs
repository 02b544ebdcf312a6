use clap::Parser;
use miette::Result;
use uidoc::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for readable diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => uidoc::cli::commands::init::run(args),
        Commands::Serve(args) => uidoc::cli::commands::serve::run(args, &global),
        Commands::Generate(args) => uidoc::cli::commands::generate::run(args, &global),
        Commands::Schema(cmd) => uidoc::cli::commands::schema::run(cmd, &global),
        Commands::Topic(cmd) => uidoc::cli::commands::topic::run(cmd, &global),
        Commands::Page(cmd) => uidoc::cli::commands::page::run(cmd, &global),
        Commands::Completions(args) => uidoc::cli::commands::completions::run(args),
    }
}
