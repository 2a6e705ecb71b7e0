//! Nameservice Command Line Interface
//!
//! Buys, updates and releases names against a local sled database, and
//! answers queries about them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nameservice_ledger::{KvLedger, Ledger};
use nameservice_registry::{
    BuyRequest, NameRegistry, Query, QueryResponse, RegistryConfig, RegistryError,
    ReleaseRequest, Request, SetValueRequest,
};
use nameservice_storage::SledKvStore;
use nameservice_types::{Address, Coins};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

mod config;

use config::{init_logging, AppConfig};

type SledRegistry = NameRegistry<SledKvStore, KvLedger<SledKvStore>>;

#[derive(Parser, Debug)]
#[command(name = "nameservice")]
#[command(about = "Buy, point and release human-readable names", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the database
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Price of a name nobody has bought yet, e.g. 1nametoken
    #[arg(long, global = true)]
    min_price: Option<Coins>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print query results as plain text instead of JSON
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bid for a name
    Buy {
        name: String,
        /// Bid amount, e.g. 2nametoken
        bid: Coins,
        /// Bidding account
        #[arg(long)]
        from: Address,
    },
    /// Point an owned name at a value
    Set {
        name: String,
        value: String,
        /// Owning account
        #[arg(long)]
        from: Address,
    },
    /// Give up an owned name
    Release {
        name: String,
        /// Owning account
        #[arg(long)]
        from: Address,
    },
    /// Value a name points at
    Resolve { name: String },
    /// Full record for a name
    Whois { name: String },
    /// List every owned name
    Names,
    /// Balance of an account
    Balance { account: Address },
    /// Mint funds into an account
    Fund { account: Address, amount: Coins },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load(cli.config.as_deref(), cli.data_dir.as_deref())?;
    apply_overrides(&mut app_config, &cli);
    init_logging(&app_config)?;

    let db = sled::open(&app_config.data_dir).with_context(|| {
        format!(
            "failed to open database at {}",
            app_config.data_dir.display()
        )
    })?;
    let names = SledKvStore::open(&db, "names")?;
    let balances = SledKvStore::open(&db, "balances")?;
    let mut registry = NameRegistry::new(
        names,
        KvLedger::new(balances),
        &RegistryConfig::with_min_price(app_config.min_price.clone()),
    );

    run(&mut registry, cli.command, cli.plain)?;
    db.flush().context("failed to flush database")?;
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(min_price) = &cli.min_price {
        config.min_price = min_price.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }
}

fn run(registry: &mut SledRegistry, command: Commands, plain: bool) -> Result<()> {
    match command {
        Commands::Buy { name, bid, from } => {
            submit(registry, BuyRequest::new(name, bid, from).into())
        }
        Commands::Set { name, value, from } => {
            submit(registry, SetValueRequest::new(name, value, from).into())
        }
        Commands::Release { name, from } => {
            submit(registry, ReleaseRequest::new(name, from).into())
        }
        Commands::Resolve { name } => print_query(registry, Query::Resolve { name }, plain),
        Commands::Whois { name } => print_query(registry, Query::Whois { name }, plain),
        Commands::Names => print_query(registry, Query::Names, plain),
        Commands::Balance { account } => {
            let balance = registry.ledger().balance(&account)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "account": account,
                    "balance": balance.to_string(),
                }))?
            );
            Ok(())
        }
        Commands::Fund { account, amount } => {
            registry.ledger_mut().credit(&account, &amount)?;
            info!(%account, %amount, "account funded");
            println!("Funded {account} with {amount}");
            Ok(())
        }
    }
}

fn submit(registry: &mut SledRegistry, request: Request) -> Result<()> {
    let kind = request.kind();
    registry.dispatch(&request).map_err(describe)?;
    println!("{kind} {} ok", request.name());
    Ok(())
}

fn print_query(registry: &SledRegistry, query: Query, plain: bool) -> Result<()> {
    let response = nameservice_registry::query(registry, &query).map_err(describe)?;
    println!("{}", format_response(&response, plain)?);
    Ok(())
}

fn format_response(response: &QueryResponse, plain: bool) -> Result<String> {
    if plain {
        Ok(response.render())
    } else {
        Ok(serde_json::to_string_pretty(response)?)
    }
}

/// Attach the (codespace, code) pair a caller can match on.
fn describe(err: RegistryError) -> anyhow::Error {
    let (codespace, code) = (err.codespace(), err.code());
    let summary = if err.is_domain() {
        "request rejected"
    } else {
        "registry backend failure"
    };
    anyhow::Error::new(err).context(format!("{summary} [{codespace}:{code}]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> String {
        Address::new([7u8; 32]).to_string()
    }

    #[test]
    fn parses_buy_with_global_flags() {
        let from = account();
        let cli = Cli::try_parse_from([
            "nameservice",
            "--data-dir",
            "/tmp/ns",
            "buy",
            "alice.id",
            "2nametoken",
            "--from",
            &from,
            "--min-price",
            "3nametoken",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/ns")));
        assert_eq!(cli.min_price, Some("3nametoken".parse().unwrap()));
        match cli.command {
            Commands::Buy { name, bid, from } => {
                assert_eq!(name, "alice.id");
                assert_eq!(bid, "2nametoken".parse().unwrap());
                assert_eq!(from, Address::new([7u8; 32]));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(Cli::try_parse_from(["nameservice", "buy", "alice.id", "2"]).is_err());
        assert!(
            Cli::try_parse_from(["nameservice", "release", "alice.id", "--from", "bogus"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["nameservice", "names"]).is_ok());
    }

    #[test]
    fn flags_override_loaded_config() {
        let cli = Cli::try_parse_from([
            "nameservice",
            "--log-level",
            "trace",
            "--min-price",
            "9gold",
            "names",
        ])
        .unwrap();
        let mut config = AppConfig {
            data_dir: PathBuf::from("./data"),
            min_price: Coins::default_min_price(),
            log_level: "info".into(),
            log_format: "pretty".into(),
        };
        apply_overrides(&mut config, &cli);
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.min_price, "9gold".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn end_to_end_against_sled() {
        let dir = tempfile::tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let mut registry = NameRegistry::new(
            SledKvStore::open(&db, "names").unwrap(),
            KvLedger::new(SledKvStore::open(&db, "balances").unwrap()),
            &RegistryConfig::default(),
        );
        let alice = Address::new([7u8; 32]);

        run(
            &mut registry,
            Commands::Fund {
                account: alice,
                amount: "10nametoken".parse().unwrap(),
            },
            false,
        )
        .unwrap();
        run(
            &mut registry,
            Commands::Buy {
                name: "alice.id".into(),
                bid: "2nametoken".parse().unwrap(),
                from: alice,
            },
            false,
        )
        .unwrap();
        assert_eq!(
            registry.ledger().balance(&alice).unwrap(),
            "8nametoken".parse().unwrap()
        );

        let err = run(
            &mut registry,
            Commands::Release {
                name: "nobody.id".into(),
                from: alice,
            },
            false,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "request rejected [nameservice:101]");
    }

    #[test]
    fn backend_failures_are_labelled_apart_from_rejections() {
        let err = describe(RegistryError::Ledger(
            nameservice_ledger::LedgerError::Overflow {
                account: Address::new([7u8; 32]),
            },
        ));
        assert_eq!(err.to_string(), "registry backend failure [nameservice:1001]");
    }

    #[test]
    fn plain_output_renders_text() {
        let names = QueryResponse::Names(vec!["a.id".into(), "b.id".into()]);
        assert_eq!(format_response(&names, true).unwrap(), "a.id\nb.id");
        assert!(format_response(&names, false).unwrap().starts_with('['));

        let cli = Cli::try_parse_from(["nameservice", "resolve", "a.id", "--plain"]).unwrap();
        assert!(cli.plain);
    }
}
