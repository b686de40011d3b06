use carrot::regex;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "carrot", about = "Compile and run patterns against input lines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a pattern and match it against each line read from stdin.
    Match {
        pattern: String,
        #[arg(value_enum, long, default_value_t = MatchMode::Longest)]
        mode: MatchMode,
    },
    /// Compile a pattern and print its DFA as a Graphviz digraph.
    Graph {
        pattern: String,
        #[arg(long)]
        nfa: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MatchMode {
    Shortest,
    Longest,
    All,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Compile(#[from] regex::CompileError),
    #[error("failed to read stdin: {0}")]
    Io(#[from] io::Error),
}

fn main() -> Result<(), CliError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Match { pattern, mode } => run_match(&pattern, mode),
        Command::Graph { pattern, nfa } => run_graph(&pattern, nfa),
    }
}

fn run_match(pattern: &str, mode: MatchMode) -> Result<(), CliError> {
    let dfa = regex::compile(pattern, None)?;
    info!("compiled {pattern:?} to a DFA with {} states", dfa.state_count());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let result = match mode {
            MatchMode::Shortest => dfa.match_shortest(&line),
            MatchMode::Longest => dfa.match_longest(&line),
            MatchMode::All => {
                for m in dfa.match_all(&line) {
                    println!("match: end={} matched={:?} label={:?}", m.end, m.matched, m.label);
                }
                continue;
            }
        };
        if result.successful {
            println!("match: end={} matched={:?} label={:?}", result.end, result.matched, result.label);
        } else {
            println!("no match");
        }
    }
    Ok(())
}

fn run_graph(pattern: &str, as_nfa: bool) -> Result<(), CliError> {
    if as_nfa {
        let nfa = regex::compile_nfa(pattern, None)?;
        println!("{}", nfa.to_graph());
    } else {
        let dfa = regex::compile(pattern, None)?;
        println!("{}", dfa.to_graph());
    }
    Ok(())
}
