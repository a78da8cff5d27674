//! tyrantkv CLI Client
//!
//! Command-line interface for a Tokyo Tyrant server.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use tyrantkv::{ClientError, Config, Session};

/// tyrantkv CLI
#[derive(Parser, Debug)]
#[command(name = "ttcli")]
#[command(about = "CLI for a Tokyo Tyrant key-value server")]
#[command(version)]
struct Cli {
    /// Server address (host:port)
    #[arg(short, long)]
    addr: String,

    /// Per-operation timeout in milliseconds (0 disables it)
    #[arg(short, long, default_value = "3000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,

        /// Write the value to this file instead of stdout
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Store a key-value pair, overwriting
    Put(StoreArgs),

    /// Store a key-value pair only if the key is absent
    PutKeep(StoreArgs),

    /// Store a key-value pair without waiting for a reply
    PutNr(StoreArgs),

    /// Delete a key
    Out {
        /// The key to delete
        key: String,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["value", "file"])))]
struct StoreArgs {
    /// The key to set
    key: String,

    /// The value to set
    value: Option<String>,

    /// Read the value from this file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl StoreArgs {
    fn value(&self) -> Result<Vec<u8>, ClientError> {
        match (&self.value, &self.file) {
            (Some(value), _) => Ok(value.as_bytes().to_vec()),
            (None, Some(path)) => Ok(fs::read(path)?),
            (None, None) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "either a value or --file is required",
            )
            .into()),
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tyrantkv=info,ttcli=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ClientError> {
    let config = Config::builder()
        .addr(&cli.addr)
        .timeout_ms(cli.timeout_ms)
        .build();
    let mut session = Session::connect(config)?;

    match &cli.command {
        Commands::Get { key, file } => {
            let value = session.get(key.as_bytes())?;
            match file {
                Some(path) => {
                    fs::write(path, &value)?;
                    tracing::info!(
                        "Retrieved value of {} at {} to {}",
                        key,
                        cli.addr,
                        path.display()
                    );
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&value)?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Put(args) => session.put(args.key.as_bytes(), &args.value()?)?,
        Commands::PutKeep(args) => session.put_keep(args.key.as_bytes(), &args.value()?)?,
        Commands::PutNr(args) => session.put_nr(args.key.as_bytes(), &args.value()?)?,
        Commands::Out { key } => session.out(key.as_bytes())?,
    }

    session.close();
    Ok(())
}
