//! CLI definition and the three run modes.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use secrecy::SecretString;
use wallet_core::amount::parse_amount;
use wallet_core::config::DEFAULT_CONFIG_FILE;
use wallet_core::vault::DEFAULT_SEED_FILE;
use wallet_core::{Config, HttpConnector, MultiWallet, SeedVault, WalletError};

/// Easy Wallet - a multi-chain wallet driven by one seed.
#[derive(Parser)]
#[command(name = "easywallet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Provider configuration (YAML).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Seed record file.
    #[arg(long, default_value = DEFAULT_SEED_FILE)]
    pub seed: PathBuf,

    /// Run mode. Omit to run a single --command.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    #[arg(long, value_enum)]
    pub command: Option<Command>,

    /// Currency label from the config, e.g. BTC.
    #[arg(long)]
    pub coin: Option<String>,

    /// Recipient address for sendtx.
    #[arg(long)]
    pub address: Option<String>,

    /// Amount in whole units for sendtx.
    #[arg(long)]
    pub amount: Option<String>,

    /// Seed encryption password.
    #[arg(long, default_value = "")]
    pub password: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Import a mnemonic and write the seed record.
    Create,
    /// Menu-driven balance and send loop.
    #[value(name = "i")]
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Command {
    Balance,
    Sendtx,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn create_seed(cli: &Cli) -> CliResult {
    let mut input = io::stdin().lock();

    let mnemonic = prompt(&mut input, "Enter master seed: ")?;
    let password = prompt(&mut input, "Enter seed encryption password: ")?;
    if password.is_empty() {
        println!("Warning! Seed is not encrypted!");
    }

    let vault = SeedVault::new(&cli.seed);
    vault.generate(&mnemonic, &SecretString::from(password))?;
    println!("Seed saved to {}", vault.path().display());
    Ok(())
}

pub fn run_interactive(cli: &Cli) -> CliResult {
    let config = Config::load(&cli.config)?;
    config.validate()?;

    let vault = SeedVault::new(&cli.seed);
    let record = vault.load()?;

    let mut input = io::stdin().lock();
    let password = if record.is_encrypted {
        prompt(&mut input, "Enter seed encryption password: ")?
    } else {
        String::new()
    };
    let seed = record.unseal(&SecretString::from(password))?;
    let mut wallet = MultiWallet::from_seed_with(&config, &seed, &HttpConnector)?;

    loop {
        let choice = prompt(
            &mut input,
            "Enter command: \n1: get balance\n2: send transaction\n3: exit\n",
        )?;
        match choice.as_str() {
            "1" => {
                let coin = prompt(&mut input, "Enter coin:\n")?;
                report(show_balance(&mut wallet, &coin));
            }
            "2" => {
                let coin = prompt(&mut input, "Enter coin:\n")?;
                let address = prompt(&mut input, "Enter recipient address:\n")?;
                let amount = prompt(&mut input, "Enter amount:\n")?;
                report(send(&mut wallet, &coin, &address, &amount));
            }
            _ => return Ok(()),
        }
    }
}

pub fn run_once(cli: &Cli) -> CliResult {
    let Some(coin) = cli.coin.as_deref() else {
        println!("coin is required");
        return Ok(());
    };

    let config = Config::load(&cli.config)?;
    let vault = SeedVault::new(&cli.seed);
    let mut wallet = MultiWallet::open(
        &config,
        &vault,
        &SecretString::from(cli.password.clone()),
    )?;

    match cli.command {
        Some(Command::Balance) => show_balance(&mut wallet, coin)?,
        Some(Command::Sendtx) => send(
            &mut wallet,
            coin,
            cli.address.as_deref().unwrap_or_default(),
            cli.amount.as_deref().unwrap_or_default(),
        )?,
        None => println!("--command is required (balance or sendtx)"),
    }
    Ok(())
}

fn show_balance(wallet: &mut MultiWallet, coin: &str) -> Result<(), WalletError> {
    println!("Coin: {coin} ({})", wallet.network());
    println!("Current address: {}", wallet.address(coin)?);
    println!("Balance: {}", wallet.balance(coin)?);
    Ok(())
}

fn send(wallet: &mut MultiWallet, coin: &str, recipient: &str, amount: &str) -> CliResult {
    println!("Current address: {}", wallet.address(coin)?);
    match wallet.balance(coin) {
        Ok(balance) => println!("Balance: {balance}"),
        Err(e) => tracing::warn!(error = %e, "balance lookup failed before send"),
    }
    println!("Coin: {coin} ({})", wallet.network());
    println!("Address: {recipient}");

    let amount = parse_amount(amount)?;
    let txid = wallet.send(coin, recipient, amount)?;
    println!("Tx: {txid}");
    Ok(())
}

/// Interactive errors end the current operation, not the loop.
fn report<E: std::fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        println!("Error: {e}");
    }
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_owned())
}
