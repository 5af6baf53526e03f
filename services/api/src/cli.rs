use crate::demo::{run_demo, run_evaluate, run_validate, DemoArgs, EvaluateArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_screen::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Screen",
    about = "Author, validate, and evaluate screening questions for job postings",
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
    /// Check a question set file and print its advisory warnings
    Validate(ValidateArgs),
    /// Evaluate a candidate's answers against a question set file
    Evaluate(EvaluateArgs),
    /// Walk through authoring, publishing, and ranking with sample candidates
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
        Command::Validate(args) => run_validate(args),
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}
