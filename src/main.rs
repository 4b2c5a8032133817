use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use superstring::Problem;
use superstring::logging;
use superstring::output::{default_output_path, write_solution};
use superstring::parser::parse_problem_file;
use superstring::search::{
    Algorithm, ParallelConfig, SearchConfig, SearchStatistics, SearchStatus, create_search,
};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "superstring")]
#[command(about = "Find symbol assignments that make every template a substring of a target")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Problem file to solve
    input: PathBuf,

    /// Where to write the solution (defaults to the input path with a .SOL extension)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Search algorithm to use
    #[arg(long, value_enum, default_value = "backtrack")]
    algorithm: CliAlgorithm,

    /// Number of worker threads for parallel search
    #[arg(long, short = 'j')]
    workers: Option<usize>,

    /// Timeout in seconds for the search
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable memoization of pattern checks
    #[arg(long)]
    no_cache: bool,

    /// Print search statistics
    #[arg(long)]
    stats: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

/// CLI algorithm selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliAlgorithm {
    /// Sequential depth-first backtracking
    Backtrack,
    /// Backtracking with the first symbol's candidates spread over threads
    Parallel,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(cli: CliAlgorithm) -> Self {
        match cli {
            CliAlgorithm::Backtrack => Algorithm::Backtrack,
            CliAlgorithm::Parallel => Algorithm::Parallel,
        }
    }
}

/// Final answer printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Yes,
    No,
    Timeout,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Yes => write!(f, "YES"),
            Verdict::No => write!(f, "NO"),
            Verdict::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

fn print_search_statistics(stats: &SearchStatistics) {
    println!("\nSearch Statistics:");
    for line in stats.format_summary().lines() {
        println!("  {}", line);
    }
}

fn run(
    args: &Args,
    problem: &Problem,
    output_path: &Path,
) -> Result<Verdict, Box<dyn std::error::Error>> {
    let config = SearchConfig::default()
        .with_algorithm(args.algorithm.into())
        .with_timeout_option(args.timeout.map(Duration::from_secs))
        .with_cache(!args.no_cache)
        .with_verbose(args.verbose);
    let parallel_config = ParallelConfig::default().with_workers_option(args.workers);

    if args.verbose {
        println!("Solving: {}", args.input.display());
        println!("Target length: {}", problem.target().len());
        println!("Distinct templates: {}", problem.templates().len());
        println!("Algorithm: {}", config.algorithm);
        if config.algorithm == Algorithm::Parallel {
            println!("Workers: {}", parallel_config.num_workers);
        }
    }

    let mut search = create_search(&config, &parallel_config);
    let result = search.search(problem, &config);

    let verdict = match &result.status {
        SearchStatus::Solved(solution) => {
            write_solution(output_path, solution)?;
            Verdict::Yes
        }
        SearchStatus::Unsatisfiable => Verdict::No,
        SearchStatus::TimedOut => Verdict::Timeout,
    };

    println!("{}", verdict);
    if verdict == Verdict::Yes && args.verbose {
        println!("Solution written to {}", output_path.display());
    }
    if args.stats {
        print_search_statistics(&result.statistics);
    }

    Ok(verdict)
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    logging::init_from_env_or(level);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let problem = match parse_problem_file(&args.input) {
        Ok(input) => input.into_problem(),
        Err(e) => {
            eprintln!("Input file is invalid");
            eprintln!("{}: {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    match run(&args, &problem, &output_path) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
