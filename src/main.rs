// lexor: parse a script and print its syntax tree

use std::fs;
use std::path::PathBuf;

use clap::Parser as _;
use crossterm::style::{Color, Stylize};
use log::{Level, LevelFilter, Log, Metadata, Record};

use lexor::parser::parse::Parser;
use lexor::visitor::{AstPrinter, NodeCounter};

/// Parse a script and print its syntax tree.
#[derive(clap::Parser, Debug)]
#[command(name = "lexor", version, about, long_about = None)]
struct Args {
    /// Script source file
    file: PathBuf,

    /// Print the token stream instead of the syntax tree
    #[arg(short, long)]
    tokens: bool,

    /// Increase log output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr, coloured by level.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = match record.level() {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Cyan,
            Level::Trace => Color::DarkGrey,
        };
        let tag = format!("[{}]", record.level()).with(color);
        eprintln!("{} {}", tag, record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);

    if !args.file.exists() {
        eprintln!(
            "{} File '{}' not found",
            "error:".red().bold(),
            args.file.display()
        );
        std::process::exit(1);
    }

    let source = fs::read_to_string(&args.file)?;
    let mut parser = Parser::new(&source);

    // Lexical errors are recoverable: report them and keep going
    for diagnostic in parser.diagnostics() {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }

    if args.tokens {
        for token in parser.tokens() {
            println!("{}", token);
        }
        return Ok(());
    }

    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    print!("{}", AstPrinter::new().print(&program));

    let counter = NodeCounter::count(&program);
    eprintln!(
        "Parsed successfully. Found {} declaration(s), {} statement(s), {} node(s).",
        program.declarations.len(),
        program.statements.len(),
        counter.total()
    );

    Ok(())
}
