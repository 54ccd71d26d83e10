use anyhow::{Context, Result};
use clap::Parser;
use mock_interview::interview::{HistoryFilter, HistoryStats};
use mock_interview::{
    terminal, Config, Feedback, HttpInterviewApi, InterviewType, ScoreBand, SessionConfig,
    SessionController, SessionMode,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mock-interview", version, about = "Practice a mock interview in the terminal")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/mock-interview")]
    config: String,

    /// Position to interview for; prompted when omitted
    #[arg(long)]
    job_role: Option<String>,

    /// List past interviews instead of starting one
    #[arg(long)]
    history: bool,

    /// With --history: only this interview type (chat, video)
    #[arg(long, requires = "history")]
    kind: Option<InterviewType>,

    /// With --history: only this score band (high, medium, low)
    #[arg(long, requires = "history")]
    band: Option<ScoreBand>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Mock Interview v{}", env!("CARGO_PKG_VERSION"));
    info!("Interview API: {}", cfg.api.base_url);

    let api = Arc::new(HttpInterviewApi::new(&cfg.api)?);
    let mut controller = SessionController::new(SessionConfig::from(&cfg), terminal::ports(api));

    if cli.history {
        let filter = HistoryFilter {
            kind: cli.kind,
            band: cli.band,
        };
        return print_history(&controller, filter).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let job_role = match cli.job_role {
        Some(role) => role,
        None => {
            prompt("Job role / position: ")?;
            lines
                .next_line()
                .await
                .context("Failed to read job role")?
                .unwrap_or_default()
        }
    };

    controller.start(&job_role, InterviewType::Chat).await?;
    println!("Type your answers. /end to finish and get scored, /quit to abandon.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    controller.abort();
                    break;
                };

                match line.trim() {
                    "/quit" => {
                        controller.abort();
                        break;
                    }
                    "/end" => match controller.end().await {
                        Ok(feedback) => {
                            print_feedback(&feedback);
                            break;
                        }
                        Err(e) => println!("{}", e),
                    },
                    text => match controller.submit(text) {
                        Ok(()) => println!("(AI is thinking...)"),
                        Err(e) => println!("{}", e),
                    },
                }
            }
            Some(event) = controller.next_event() => {
                controller.handle_event(event).await;
            }
        }
    }

    if controller.mode() == SessionMode::Completed {
        controller.start_new()?;
    }

    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

fn print_feedback(feedback: &Feedback) {
    println!("\nInterview complete!");
    println!("Your score: {}/100 ({})", feedback.score, feedback.band());

    print_section("Strengths", &feedback.strengths);
    print_section("Areas for improvement", &feedback.weaknesses);
    print_section("Recommendations", &feedback.recommendations);

    if !feedback.overall_feedback.is_empty() {
        println!("\nOverall feedback:\n  {}", feedback.overall_feedback);
    }
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

async fn print_history(controller: &SessionController, filter: HistoryFilter) -> Result<()> {
    let entries = controller
        .load_history()
        .await
        .context("Failed to load interview history")?;
    let shown = filter.apply(&entries);

    println!(
        "{} interview{} found",
        shown.len(),
        if shown.len() == 1 { "" } else { "s" }
    );

    for entry in &shown {
        println!(
            "#{:<5} {:<6} {}  {:>3}/100  {}",
            entry.id,
            entry.interview_type,
            entry.created_at.format("%b %d, %Y"),
            entry.score(),
            entry.feedback.band()
        );
    }

    if let Some(stats) = HistoryStats::from_entries(&shown) {
        println!(
            "\nAverage score: {}  Best score: {}  Total: {}",
            stats.average, stats.best, stats.count
        );
    }

    Ok(())
}
