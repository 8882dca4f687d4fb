use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

mod error;
mod lexer;

use crate::error::{ClexError, ErrorCollector};
use crate::lexer::Pipeline;

#[derive(Parser)]
#[command(name = "clex")]
#[command(author, version, about = "A multi-pass lexical analyzer for a C-like language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a source file and print the token stream
    Tokens {
        /// The source file to tokenize
        input: PathBuf,

        /// Print tokens as JSON instead of `<TAG, lexeme>` lines
        #[arg(long)]
        json: bool,

        /// Also run the identifier stage
        #[arg(long)]
        identifiers: bool,

        /// Also run the bitwise/logical operator stage
        #[arg(long)]
        bitwise: bool,

        /// Also run the multi-line comment stage
        #[arg(long)]
        multi_comments: bool,
    },

    /// Check a source file for unclassifiable text without printing tokens
    Check {
        /// The source file to check
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Tokens {
            input,
            json,
            identifiers,
            bitwise,
            multi_comments,
        } => tokens(input, json, identifiers, bitwise, multi_comments),
        Commands::Check { input } => check(input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Per-file state shared by the subcommands
struct SourceState {
    source: String,
    files: SimpleFiles<String, String>,
    file_id: usize,
}

impl SourceState {
    fn new(path: PathBuf) -> Result<Self> {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read source file: {:?}", path))?;

        let mut files = SimpleFiles::new();
        let file_id = files.add(path.display().to_string(), source.clone());

        Ok(Self {
            source,
            files,
            file_id,
        })
    }

    fn report_error(&self, diagnostic: &Diagnostic<usize>) -> Result<()> {
        let writer = StandardStream::stderr(ColorChoice::Always);
        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, diagnostic)?;
        Ok(())
    }
}

fn build_pipeline(identifiers: bool, bitwise: bool, multi_comments: bool) -> Pipeline {
    let mut pipeline = Pipeline::standard();
    if multi_comments {
        pipeline = pipeline.with_multi_comments();
    }
    if bitwise {
        pipeline = pipeline.with_bitwise_operators();
    }
    if identifiers {
        pipeline = pipeline.with_identifiers();
    }
    pipeline
}

fn tokens(
    input: PathBuf,
    json: bool,
    identifiers: bool,
    bitwise: bool,
    multi_comments: bool,
) -> Result<()> {
    log::debug!("Tokenizing {:?}", input);

    let state = SourceState::new(input)?;
    let pipeline = build_pipeline(identifiers, bitwise, multi_comments);
    let analysis = pipeline.analyze(&state.source);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis.tokens)?);
    } else {
        println!("{}", "=== Tokens ===".blue().bold());
        for (i, token) in analysis.tokens.iter().enumerate() {
            println!("{:4}: {}", i, token);
        }
    }

    if !analysis.is_clean() {
        eprintln!(
            "{}: {} unclassified chunk(s) dropped; run `clex check` for details",
            "warning".yellow().bold(),
            analysis.residue.len()
        );
    }

    Ok(())
}

fn check(input: PathBuf) -> Result<()> {
    log::debug!("Checking {:?}", input);

    let state = SourceState::new(input)?;
    let analysis = Pipeline::standard().analyze(&state.source);

    let mut collector = ErrorCollector::new();
    for error in analysis.errors() {
        collector.add_error(ClexError::Lexer(error), state.file_id);
    }

    if collector.has_errors() {
        for error in collector.errors() {
            state.report_error(&error.to_diagnostic())?;
        }
        anyhow::bail!("lexical analysis failed with {} error(s)", collector.error_count());
    }

    println!(
        "{}: {} token(s), no unclassified text",
        "success".green().bold(),
        analysis.tokens.len()
    );
    Ok(())
}
