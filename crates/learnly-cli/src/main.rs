mod cli;
mod engine;

use cli::{CliError, CliOptions};
use engine::run_command;
use learnly_core::config::load_dotenv;
use learnly_core::{Dashboard, LearnlyConfig};
use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "learnly=info,learnly_core=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

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

    let mut config = match LearnlyConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };
    if options.exclude_greeting {
        config.include_greeting_in_history = false;
    }

    let dashboard = match Dashboard::from_config(&config) {
        Ok(dashboard) => dashboard,
        Err(err) => {
            error!("failed to build dashboard: {err}");
            std::process::exit(1);
        }
    };

    let outcome = run_command(&dashboard, &options.command).await;
    let snapshot = match outcome {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!("{} failed: {err}", options.command.as_str());
            if let Some(alert) = err.alert() {
                eprintln!("{alert}");
            }
            print_snapshot(&dashboard.snapshot());
            std::process::exit(1);
        }
    };

    print_snapshot(&snapshot);
}

fn print_snapshot(snapshot: &learnly_core::DashboardSnapshot) {
    match serde_json::to_string_pretty(snapshot) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            error!("failed to render dashboard snapshot: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "Usage: learnly <command> [--exclude-greeting]\n\
         \n\
         Commands:\n\
         - chat MESSAGE...                    Send each message to the AI tutor in turn\n\
         - plan [GOAL]                        Generate a weekly study plan\n\
         - search QUERY                       Look up a topic with web grounding\n\
         - edit-image COURSE_ID PROMPT [--apply]\n\
                                              Edit a course thumbnail, optionally applying it\n\
         - courses                            Print the course catalog\n\
         \n\
         Options:\n\
         - --exclude-greeting  Do not replay the opening greeting to the model\n\
         - --help              Show this help text\n\
         \n\
         Environment: GEMINI_API_KEY (required), GEMINI_API_BASE_URL, GEMINI_TIMEOUT_MS,\n\
         LEARNLY_CHAT_MODEL, LEARNLY_PLAN_MODEL, LEARNLY_SEARCH_MODEL, LEARNLY_IMAGE_MODEL,\n\
         LEARNLY_THINKING_BUDGET, LEARNLY_INCLUDE_GREETING"
    );
}
