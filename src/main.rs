use clap::Parser;
use finance_tracker::args::{Args, Command};
use finance_tracker::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().tracker_home().path();

    // This allows for running the program without a tracker backend. When TRACKER_IN_TEST_MODE is
    // set and non-zero in length, then the mode will be Mode::Test, otherwise it will be
    // Mode::Http.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url()).await?.print(),

        Command::Login(creds) => {
            let config = Config::load(home).await?;
            commands::login(&config, mode, creds.username(), creds.password())
                .await?
                .print()
        }

        Command::Register(creds) => {
            let config = Config::load(home).await?;
            commands::register(&config, mode, creds.username(), creds.password())
                .await?
                .print()
        }

        Command::Create(create_args) => {
            let config = Config::load(home).await?;
            commands::create(&config, mode, create_args).await?.print()
        }

        Command::Show(year_args) => {
            let config = Config::load(home).await?;
            commands::show(&config, mode, year_args).await?.print()
        }

        Command::Week(week_args) => {
            let config = Config::load(home).await?;
            commands::week(&config, mode, week_args).await?.print()
        }

        Command::Income(year_args) => {
            let config = Config::load(home).await?;
            commands::income(&config, mode, year_args).await?.print()
        }

        Command::AddExpense(expense_args) => {
            let config = Config::load(home).await?;
            commands::add_expense(&config, mode, expense_args)
                .await?
                .print()
        }

        Command::AddIncome(income_args) => {
            let config = Config::load(home).await?;
            commands::add_income(&config, mode, income_args)
                .await?
                .print()
        }

        Command::Budget(budget_args) => {
            let config = Config::load(home).await?;
            commands::budget(&config, mode, budget_args).await?.print()
        }

        Command::SetExpense(set_args) => {
            let config = Config::load(home).await?;
            commands::set_expense(&config, mode, set_args).await?.print()
        }

        Command::SetIncome(set_args) => {
            let config = Config::load(home).await?;
            commands::set_income(&config, mode, set_args).await?.print()
        }

        Command::Log(log_args) => {
            let config = Config::load(home).await?;
            commands::log(&config, mode, log_args).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "finance_tracker",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
