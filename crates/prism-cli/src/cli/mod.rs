mod problem;

pub use problem::{ProblemSpec, SolveOutput};

use anyhow::Context;
use clap::Parser;
use prism_core::core::Prism;
use prism_core::solver::SolverMethod;
use std::fs;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Parse and execute a command line. Returns the process exit code; usage
/// errors, assembly failures and failed convergence are all non-zero.
pub fn run<I, S>(args: I) -> anyhow::Result<i32>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("prism-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    let cli = match Cli::try_parse_from(&full_args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(anyhow::anyhow!(error.to_string())),
        },
    };

    match cli.command {
        CliCommand::Solve(args) => solve_command(args),
        CliCommand::Check(args) => check_command(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(name = "prism-rs", about = "PRISM integral-equation solver")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Solve the PRISM equations for a JSON problem description
    Solve(SolveArgs),
    /// Assemble and validate a problem description without solving
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Path to the JSON problem description
    input: PathBuf,
    /// Where to write the JSON solution; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Override the solver method from the problem description
    #[arg(long)]
    method: Option<SolverMethod>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Path to the JSON problem description
    input: PathBuf,
}

fn load_spec(path: &PathBuf) -> anyhow::Result<ProblemSpec> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    ProblemSpec::from_json(&source)
}

fn solve_command(args: SolveArgs) -> anyhow::Result<i32> {
    let spec = load_spec(&args.input)?;
    let system = spec.assemble()?;
    let mut prism = Prism::new(&system).context("failed to assemble the PRISM problem")?;

    let method = args.method.unwrap_or_else(|| spec.method());
    let options = spec.options();
    let report = prism
        .solve(None, method, &options)
        .context("solve aborted")?;

    let output = SolveOutput::collect(&mut prism, &report, method)?;
    let rendered =
        serde_json::to_string_pretty(&output).context("failed to serialize the solution")?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "solution written");
        }
        None => println!("{rendered}"),
    }

    if report.success {
        Ok(0)
    } else {
        eprintln!("solve did not converge: {}", report.message);
        Ok(2)
    }
}

fn check_command(args: CheckArgs) -> anyhow::Result<i32> {
    let spec = load_spec(&args.input)?;
    let system = spec.assemble()?;
    println!(
        "ok: {} site types on a {}-point grid",
        system.rank(),
        system.domain().expect("assemble validated the domain").length()
    );
    Ok(0)
}
