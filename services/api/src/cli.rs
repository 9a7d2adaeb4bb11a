use crate::demo::{run_demo, run_schedule_report, DemoArgs, ScheduleReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use eicr_schedule::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EICR Schedule Service",
    about = "Record and evaluate EICR schedule-of-tests results from the command line",
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
    /// Work with a schedule of tests without starting the service
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Run an end-to-end CLI demo over a sample schedule
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Evaluate a schedule export and print the compliance report
    Report(ScheduleReportArgs),
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
        Command::Schedule {
            command: ScheduleCommand::Report(args),
        } => run_schedule_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
