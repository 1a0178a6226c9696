use crate::demo::{run_demo, run_normalize, DemoArgs, NormalizeArgs};
use crate::server;
use brand_board::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Brand Board",
    about = "Run the brand directory and leaderboard service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Reshape a JSON export of brand or leaderboard records into display cards
    Normalize(NormalizeArgs),
    /// Seed an in-memory directory, cast sample ratings, and print the leaderboard
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Normalize(args) => run_normalize(args),
        Command::Demo(args) => run_demo(args),
    }
}
