use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fishbone::config::Config;
use fishbone::provider::{InferenceProvider, OpenAiProvider};
use fishbone::session::{self, ExportStatus, RunOutcome};
use fishbone::FishboneAnalyzer;

#[derive(Parser)]
#[command(name = "fishbone")]
#[command(about = "Fishbone (Ishikawa) root-cause analysis with a hosted language model")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model name (overrides FISHBONE_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Maximum causes per category
    #[arg(long, global = true)]
    max_causes: Option<usize>,

    /// Maximum depth of each "why" chain
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Directory for saved analyses (overrides FISHBONE_OUTPUT_DIR)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print results without saving them
    #[arg(long, global = true)]
    no_save: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single problem and exit
    Analyze {
        /// Problem statement to analyze
        #[arg(required = true, num_args = 1..)]
        problem: Vec<String>,
    },
    /// Prompt for problems until 'quit' (default)
    Interactive,
}

/// Initialize tracing on stderr so stdout carries only the rendered tree.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "fishbone=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(ref model) = cli.model {
        config.provider.model = model.clone();
    }
    if let Some(max_causes) = cli.max_causes {
        config.analysis.max_causes = max_causes;
    }
    if let Some(max_depth) = cli.max_depth {
        config.analysis.max_depth = max_depth;
    }
    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.provider.timeout = Duration::from_secs(secs);
    }
}

fn print_outcome(outcome: &RunOutcome) {
    print!("{}", outcome.rendered);
    match &outcome.export {
        ExportStatus::Saved(path) => println!("Results saved to: {}", path.display()),
        ExportStatus::Failed(e) => eprintln!("Error saving file: {}", e),
        ExportStatus::Skipped => {}
    }
}

async fn interactive<P: InferenceProvider>(
    analyzer: &FishboneAnalyzer<P>,
    output_dir: Option<&Path>,
) -> anyhow::Result<()> {
    println!("==================================================");
    println!("FISHBONE ANALYSIS SYSTEM");
    println!("==================================================");

    let stdin = std::io::stdin();
    let mut completed = 0usize;

    loop {
        print!("\nEnter problem to analyze (or 'quit' to exit): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let problem = line.trim();

        if session::is_quit_command(problem) {
            break;
        }
        if problem.is_empty() {
            println!("Please enter a valid problem statement.");
            continue;
        }

        println!("\nAnalyzing: {}", problem);
        let interrupt = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        match session::run_until_interrupted(analyzer, problem, output_dir, interrupt).await {
            Ok(Some(outcome)) => {
                print_outcome(&outcome);
                completed += 1;
            }
            Ok(None) => {
                println!("\n\nAnalysis interrupted.");
                break;
            }
            Err(e) => println!("Error during analysis: {}", e),
        }
    }

    println!("\nSession completed. Analyses performed: {}", completed);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load().context("failed to load configuration")?;
    apply_overrides(&cli, &mut config);

    let provider =
        OpenAiProvider::new(&config.provider).context("failed to initialise inference provider")?;
    let analyzer = FishboneAnalyzer::new(provider, config.analysis.clone());
    let output_dir = (!cli.no_save).then(|| config.output_dir.clone());

    match cli.command {
        Some(Commands::Analyze { ref problem }) => {
            let outcome =
                session::run_analysis(&analyzer, &problem.join(" "), output_dir.as_deref()).await?;
            print_outcome(&outcome);
        }
        Some(Commands::Interactive) | None => {
            interactive(&analyzer, output_dir.as_deref()).await?;
        }
    }

    Ok(())
}
