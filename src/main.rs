use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use short_sign::{Credential, decode, encode, find_one};
use short_sign_cli::configuration::Config;
use short_sign_cli::directory::CredentialStore;

const DEFAULT_CONF: &str = "conf.yaml";

#[derive(Parser)]
#[command(name = "short-sign", version, about = "Issue and verify short digit tokens")]
struct Cli {
    /// Config file (defaults to ./conf.yaml when present)
    #[arg(short, long, global = true)]
    conf: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue a token for an id and secret
    Encode {
        #[arg(long)]
        id: String,
        #[arg(long)]
        secret: String,
    },
    /// Print the id and issue time carried by a token, without verifying it
    Decode {
        token: String,
        /// Validity window in seconds (overrides the config)
        #[arg(long)]
        expires_in: Option<u64>,
    },
    /// Verify a token against a credentials file
    Verify {
        token: String,
        #[arg(long)]
        credentials: PathBuf,
        /// Validity window in seconds (overrides the config)
        #[arg(long)]
        expires_in: Option<u64>,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(DEFAULT_CONF).exists() => Ok(Config::load(DEFAULT_CONF)?),
        None => Ok(Config::default()),
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = load_config(cli.conf.as_deref())?;

    match cli.command {
        Command::Encode { id, secret } => {
            let signed = encode(&Credential::new(id, secret), &config.sign_config())?;
            println!("{signed}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Decode { token, expires_in } => {
            match decode(&token, &config.verify_config(expires_in)) {
                Some(decoded) => {
                    println!(
                        "id={} timestamp={} checksum={}",
                        decoded.id, decoded.timestamp, decoded.checksum
                    );
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("invalid");
                    Ok(ExitCode::from(1))
                }
            }
        }
        Command::Verify {
            token,
            credentials,
            expires_in,
        } => {
            let store = CredentialStore::load(&credentials)?;
            let verification = find_one(&token, &config.verify_config(expires_in), &store)?;
            let found = verification
                .into_ready()
                .map_err(|_| "credential store returned a pending lookup")?;
            match found {
                Some(credential) => {
                    println!("valid id={}", credential.id());
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("invalid");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn main() -> ExitCode {
    // Enable basic logging; set RUST_LOG=debug to see why tokens are rejected.
    env_logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
