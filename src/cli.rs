//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_quote_adapter::HttpQuoteAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::adapters::web::{auth, build_router, AppState};
use crate::domain::error::StocksimError;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "stocksim", about = "Virtual stock trading web application")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create the database schema
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Output an argon2 hash for a password read from stdin
    HashPassword,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::InitDb { config } => run_init_db(&config),
        Command::HashPassword => run_hash_password(),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StocksimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    use std::net::SocketAddr;
    use std::sync::Arc;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stocksim=info")),
        )
        .init();

    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match SqliteAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = store.initialize_schema() {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let quotes = match HttpQuoteAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let addr: SocketAddr = config
        .get_string("web", "listen")
        .unwrap_or_else(|| "127.0.0.1:3000".to_string())
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:3000".parse().expect("default listen address"));

    eprintln!("Starting web server on {addr}");

    let state = AppState {
        store: Arc::new(store),
        quotes: Arc::new(quotes),
        config: Arc::new(config),
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::from(1);
        }
    };

    runtime.block_on(async {
        let router = build_router(state).await;
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error: failed to bind {addr}: {e}");
                return ExitCode::from(1);
            }
        };
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("error: server exited: {e}");
            return ExitCode::from(1);
        }
        ExitCode::SUCCESS
    })
}

fn run_init_db(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match SqliteAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match store.initialize_schema() {
        Ok(()) => {
            eprintln!("Database schema created");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_hash_password() -> ExitCode {
    use std::io::{self, BufRead};

    eprintln!("Enter password to hash:");
    let stdin = io::stdin();
    let password = match stdin.lock().lines().next() {
        Some(Ok(line)) => line,
        _ => {
            eprintln!("error: failed to read password");
            return ExitCode::from(1);
        }
    };

    match auth::hash_password(&password) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
