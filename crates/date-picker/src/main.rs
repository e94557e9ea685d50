mod cli;
mod render;

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::Local;
use cli::{CliError, CliOptions, Command};
use shared::categories::EventCategory;
use shared::config::{PickerConfig, load_dotenv};
use shared::llm::{GroqConfigError, GroqGateway, GroqGatewayConfig};
use shared::recommendation::RecommendationClient;
use shared::session::DateSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(CliError::HelpRequested) => {
            print_usage();
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "date_picker=info,shared=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match PickerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load picker config");
            std::process::exit(1);
        }
    };

    let recommender = match build_recommender(config.candidate_limit) {
        Ok(recommender) => recommender,
        Err(err) => {
            error!(error = %err, "failed to configure Groq gateway");
            std::process::exit(1);
        }
    };

    let mut session = DateSession::new(Local::now().date_naive(), config.animation, recommender);
    if let Some(year) = options.year
        && let Err(err) = session.select_year(year)
    {
        eprintln!("{}", render::session_error(&err));
        std::process::exit(2);
    }

    info!(
        year = session.state().year(),
        candidate_limit = config.candidate_limit,
        "date picker starting"
    );

    let rolling = tokio::spawn(render::rolling_display(session.display()));
    println!(
        "{}",
        render::banner(session.state().year(), session.is_recommender_configured())
    );

    run_prompt_loop(&mut session).await;

    rolling.abort();
    info!(used = session.state().used_dates().len(), "date picker stopped");
}

/// A missing API key is not fatal; every request then takes the fallback path.
fn build_recommender(candidate_limit: usize) -> Result<RecommendationClient, GroqConfigError> {
    let config = match GroqGatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) if err.is_missing_credential() => {
            warn!(error = %err, "Groq API key is not configured; using fallback dates");
            return Ok(RecommendationClient::unconfigured(candidate_limit));
        }
        Err(err) => return Err(err),
    };

    let gateway = GroqGateway::new(config)?;
    info!(model = gateway.model(), "Groq gateway configured");
    Ok(RecommendationClient::new(Arc::new(gateway), candidate_limit))
}

async fn run_prompt_loop(session: &mut DateSession) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        render::prompt();

        let line = tokio::select! {
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!(error = %err, "failed to read command");
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", render::command_error(&err));
                continue;
            }
        };

        // Dropping an in-flight request leaves the session untouched.
        let flow = tokio::select! {
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            flow = execute(session, command) => flow,
        };

        if flow.is_break() {
            break;
        }
    }
}

async fn execute(session: &mut DateSession, command: Command) -> ControlFlow<()> {
    match command {
        Command::RequestDate => match session.request_date().await {
            Ok(source) => println!("{}", render::selection(session.state(), &source)),
            Err(err) => {
                warn!(error = %err, "date request rejected");
                println!("{}", render::session_error(&err));
            }
        },
        Command::Finalize => {
            if session.finalize() {
                info!("wedding date confirmed");
                println!("{}", render::finalized(session.state()));
            } else {
                println!("{}", render::nothing_to_finalize());
            }
        }
        Command::ForgetHistory => {
            session.forget_history();
            println!("{}", render::history_forgotten());
        }
        Command::ToggleCategory(query) => match EventCategory::lookup(&query) {
            Some(category) => {
                let enabled = session.toggle_category(category.label());
                println!(
                    "{}",
                    render::category_toggled(category, enabled, session.state().categories())
                );
            }
            None => println!("{}", render::unknown_category(&query)),
        },
        Command::ListCategories => {
            println!("{}", render::categories(session.state().categories()));
        }
        Command::SelectYear(year) => match session.select_year(year) {
            Ok(()) => println!(
                "{}",
                render::year_selected(year, session.available_dates().len())
            ),
            Err(err) => println!("{}", render::session_error(&err)),
        },
        Command::Status => println!(
            "{}",
            render::status(session.state(), session.available_dates().len())
        ),
        Command::Help => println!("{}", render::help()),
        Command::Quit => return ControlFlow::Break(()),
    }

    ControlFlow::Continue(())
}

fn print_usage() {
    eprintln!(
        "Usage: cargo run -p date-picker -- [--year YYYY]\n\
         \n\
         Picks a weekend wedding date and pairs it with a historical event\n\
         that happened on the same day and month.\n\
         \n\
         Options:\n\
         - --year YYYY  Search this year instead of next year\n\
         - --help       Show this help text\n\
         \n\
         Environment:\n\
         - GROQ_API_KEY                  Chat-completion credential (optional)\n\
         - GROQ_MODEL                    Model identifier\n\
         - PICKER_ANIMATION_DURATION_MS  Rolling animation length\n\
         - RUST_LOG                      Log filter, logs go to stderr"
    );
}
