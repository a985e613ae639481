use crate::demo::{run_demo, DemoArgs};
use crate::server;
use career_sponsorship::config::AppConfig;
use career_sponsorship::error::AppError;
use career_sponsorship::workflows::sponsorship::CodePeriod;
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Career Sponsorship",
    about = "Manage careers, teachers and sponsorship letters from the command line",
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
    /// Print the sponsorship code for a teacher sequence
    Code(CodeArgs),
    /// Draft a career, register a teacher and write a filled sponsorship letter
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

#[derive(Args, Debug)]
pub(crate) struct CodeArgs {
    /// Teacher sequence number assigned by the teacher store
    #[arg(long)]
    pub(crate) sequence: u32,
    /// Issue year (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Issue month, 1-12 (defaults to the current month)
    #[arg(long, value_parser = crate::infra::parse_month)]
    pub(crate) month: Option<u32>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Code(args) => print_code(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn print_code(args: CodeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let today = chrono::Local::now();
    let period = CodePeriod::new(
        args.year.unwrap_or_else(|| today.year()),
        args.month.unwrap_or_else(|| today.month()),
    )?;
    let code = config
        .sponsorship
        .code_generator()
        .generate(Some(args.sequence), period)?;
    println!("{code}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn code_subcommand_parses_period_overrides() {
        let cli = Cli::try_parse_from([
            "career-sponsorship-api",
            "code",
            "--sequence",
            "7",
            "--year",
            "2025",
            "--month",
            "3",
        ])
        .expect("parsed");

        match cli.command {
            Some(Command::Code(args)) => {
                assert_eq!(args.sequence, 7);
                assert_eq!(args.year, Some(2025));
                assert_eq!(args.month, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_month_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from([
            "career-sponsorship-api",
            "code",
            "--sequence",
            "7",
            "--month",
            "13",
        ]);
        assert!(result.is_err());
    }
}
