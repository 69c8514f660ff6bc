//! minic - front end driver
//!
//! Tokenizes or parses a source file and prints the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use minic::feedback::ErrorReport;
use minic::frontend::lexer::Lexer;
use minic::frontend::parser::parse_source;
use minic::frontend::printer::print_tree;
use minic::frontend::tree::Node;

/// minic front end
#[derive(Parser, Debug)]
#[command(name = "minic")]
#[command(version = "0.1.0")]
#[command(about = "Lexer and parser for a small C-like language")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the token stream of a source file
    Tokens {
        /// Input source file
        input: PathBuf,

        /// Include whitespace tokens
        #[arg(long)]
        whitespace: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse a source file and print its syntax tree
    Parse {
        /// Input source file
        input: PathBuf,

        /// Emit JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },
    /// Check a source file for syntax errors
    Check {
        /// Input source file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the source has a syntax error
fn run(command: &Commands) -> Result<bool> {
    match command {
        Commands::Tokens { input, whitespace, json } => {
            let source = read_source(input)?;
            let tokens = Lexer::new(&source).keep_whitespace(*whitespace).tokenize();
            if *json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }
            Ok(true)
        }
        Commands::Parse { input, json } => {
            let source = read_source(input)?;
            match parse_source(&source) {
                Ok(program) => {
                    info!("parsed {} statements", program.body.len());
                    if *json {
                        println!("{}", serde_json::to_string_pretty(&Node::from(&program))?);
                    } else {
                        print!("{}", print_tree(&program));
                    }
                    Ok(true)
                }
                Err(e) => {
                    let report = ErrorReport::from_error(&e, &input.display().to_string(), &source);
                    if *json {
                        println!("{}", report.to_json());
                    } else {
                        eprintln!("{}", report.render());
                    }
                    Ok(false)
                }
            }
        }
        Commands::Check { input } => {
            let source = read_source(input)?;
            match parse_source(&source) {
                Ok(_) => {
                    println!("ok");
                    Ok(true)
                }
                Err(e) => {
                    let report = ErrorReport::from_error(&e, &input.display().to_string(), &source);
                    eprintln!("{}", report.render());
                    Ok(false)
                }
            }
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    info!("reading {}", path.display());
    fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}
