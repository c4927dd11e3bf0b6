use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use kaleidoscope::ast_printer::AstPrinter;
use kaleidoscope::driver::Driver;
use kaleidoscope::parser::Parser;
use kaleidoscope::precedence::PrecedenceTable;
use kaleidoscope::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Kaleidoscope lexer and parser", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,

    /// JSON file of extra operator precedences, e.g. {"/": 40}
    #[arg(long, global = true, value_name = "FILE")]
    precedence: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file (or stdin), printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses every top-level unit and prints its tree
    Parse {
        filename: Option<PathBuf>,

        /// Print trees as JSON instead of S-expressions
        #[arg(long)]
        json: bool,
    },

    /// Interactive loop acknowledging each parsed unit
    Repl { filename: Option<PathBuf> },
}

/// Opens `filename` for streaming, or stdin when absent.
fn open_source(filename: Option<&PathBuf>) -> Result<Box<dyn Read>> {
    match filename {
        Some(filename) => {
            info!("Reading file: {:?}", filename);
            let file =
                File::open(filename).context(format!("Failed to open file {:?}", filename))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("Reading stdin");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

fn load_precedence(path: Option<&PathBuf>) -> Result<PrecedenceTable> {
    match path {
        Some(path) => PrecedenceTable::load(path)
            .context(format!("Failed to load operator precedences from {:?}", path)),
        None => Ok(PrecedenceTable::standard()),
    }
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with timestamp, module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'kaleidoscope::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("kaleidoscope::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{} {}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let table: PrecedenceTable = load_precedence(args.precedence.as_ref())?;

    match args.commands {
        Commands::Tokenize { filename } => {
            info!("Running Tokenize subcommand");
            let scanner = Scanner::new(open_source(filename.as_ref())?);

            for token in scanner {
                let token = token.context("Failed to read input")?;

                debug!("Scanned token: {}", token);

                println!("{}", token);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");
            let scanner = Scanner::new(open_source(filename.as_ref())?);
            let parser = Parser::new(scanner, &table).context("Failed to read input")?;
            let mut failed = false;

            for item in parser {
                match item {
                    Ok(item) => {
                        let rendered = if json {
                            serde_json::to_string(&item)?
                        } else {
                            AstPrinter::print_item(&item)
                        };

                        debug!("Parsed item: {}", rendered);
                        println!("{}", rendered);
                    }

                    Err(e) if e.is_syntax() => {
                        failed = true;
                        debug!("Parse debug: {}", e);
                        eprintln!("{}", e);
                    }

                    Err(e) => return Err(e).context("Failed to read input"),
                }
            }

            if failed {
                debug!("Parse failed, exiting with code 65");
                std::process::exit(65);
            }

            info!("Parse subcommand completed");
        }

        Commands::Repl { filename } => {
            info!("Running Repl subcommand");
            let interactive = filename.is_none();
            let scanner = Scanner::new(open_source(filename.as_ref())?);

            let mut driver = if interactive {
                Driver::interactive(scanner, &table, io::stdout(), io::stderr())
            } else {
                Parser::new(scanner, &table)
                    .map(|parser| Driver::new(parser, io::stdout(), io::stderr()).prompt(false))
            }
            .context("Failed to read input")?;

            let summary = driver.run().context("Failed to read input")?;

            info!("Repl finished: {:?}", summary);
        }
    }

    Ok(())
}
