use crate::render::{run_assess, run_link, run_questions, AssessArgs, LinkArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use decision_helper::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "RN vs Native decision helper",
    about = "Score the React Native vs. native questionnaire from the command line or over HTTP",
    version
)]
struct Cli {
    /// JSON catalog document to use instead of the standard questionnaire
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the questions, grouped by category, with option weights
    Questions,
    /// Score a set of answers and print the recommendation
    Assess(AssessArgs),
    /// Print a shareable link that encodes a set of answers
    Link(LinkArgs),
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
        Command::Serve(args) => server::run(args, cli.catalog).await,
        Command::Questions => run_questions(cli.catalog),
        Command::Assess(args) => run_assess(args, cli.catalog),
        Command::Link(args) => run_link(args, cli.catalog),
    }
}
