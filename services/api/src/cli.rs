use crate::demo::{run_advisor_report, run_demo, AdvisorReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nourish_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Nourish Advisor",
    about = "Run the household food-waste advisory service from the command line",
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
    /// Generate advisory reports against the bundled demo ledger
    Advisor {
        #[command(subcommand)]
        command: AdvisorCommand,
    },
    /// Run an end-to-end CLI demo covering risks, waste, SDG, and planning
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AdvisorCommand {
    /// Print risk, waste, and SDG reports for the demo ledger
    Report(AdvisorReportArgs),
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
        Command::Advisor {
            command: AdvisorCommand::Report(args),
        } => run_advisor_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
