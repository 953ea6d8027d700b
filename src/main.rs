use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dancing_links::{Problem, SolverConfig, Sudoku};

// Solved when no input is given
const EXAMPLE: &str = "\
# 7 elements, 6 candidate rows
7
2 4 5
0 3 6
1 2 5
0 3
1 6
3 4 6
";

/// Find an exact cover with Dancing Links
#[derive(Debug, Parser)]
#[command(name = "dancing-links", version, about)]
struct Args {
    /// Problem file, `-` for stdin. Solves a built in example if omitted.
    ///
    /// The first line holds the universe size, every further line one row of
    /// whitespace separated elements. `#` starts a comment, `-` is an empty row.
    input: Option<PathBuf>,

    /// Read one sudoku in line format per input line instead
    #[arg(long)]
    sudoku: bool,

    /// Write a Graphviz rendering of the matrix to this file before solving
    #[arg(long, value_name = "PATH", conflicts_with = "sudoku")]
    dot: Option<PathBuf>,

    /// Give up after visiting this many search nodes
    #[arg(long, value_name = "NODES")]
    node_limit: Option<u64>,

    /// Give up after this many milliseconds
    #[arg(long, value_name = "MS")]
    time_limit_ms: Option<u64>,
}

impl Args {
    fn config(&self) -> SolverConfig {
        SolverConfig {
            node_limit: self.node_limit,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            None => Ok(EXAMPLE.to_string()),
            Some(path) if path.as_os_str() == "-" => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
                Ok(input)
            }
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

fn solve_sudokus(input: &str, config: &SolverConfig) -> anyhow::Result<()> {
    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let sudoku = Sudoku::from_str_line(line)
            .with_context(|| format!("invalid sudoku on line {}", idx + 1))?;
        match sudoku.solve_with(config)? {
            Some(solution) => println!("{}", solution.to_str_line()),
            None => println!("no solution"),
        }
    }
    Ok(())
}

fn solve_problem(input: &str, args: &Args) -> anyhow::Result<()> {
    let problem: Problem = input.parse().context("invalid problem")?;
    let matrix = problem.matrix().context("invalid problem")?;

    if let Some(path) = &args.dot {
        fs::write(path, matrix.dot().to_string())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    match matrix.solve_with(&args.config())? {
        Some(solution) => {
            println!("{} rows", solution.len());
            for &id in solution.rows() {
                let row = problem.row(id).unwrap_or(&[]);
                println!("{}: {:?}", id, row);
            }
            let stats = solution.stats();
            println!("{} nodes, {} updates", stats.nodes, stats.updates);
        }
        None => println!("no solution"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let input = args.read_input()?;

    if args.sudoku {
        solve_sudokus(&input, &args.config())
    } else {
        solve_problem(&input, &args)
    }
}
