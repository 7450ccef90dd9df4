use clap::{Parser, Subcommand};
use dayboard::commands::{init, serve, today};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Run the dashboard HTTP server")]
    Serve(serve::ServeArgs),
    #[command(about = "Print the Today view without starting the server")]
    Today(today::TodayArgs),
}

fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init::cmd(args),
        Commands::Serve(args) => serve::cmd(args),
        Commands::Today(args) => today::cmd(args),
    }
}
