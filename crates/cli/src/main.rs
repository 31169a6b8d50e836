//! Easy Wallet - send and check balances for BTC, ETH and ERC-20 tokens
//! from one BIP-39 seed.
//!
//! Modes:
//!   easywallet --mode create                       store a new seed record
//!   easywallet --mode i                            interactive menu
//!   easywallet --command balance --coin BTC        one-shot balance
//!   easywallet --command sendtx --coin ETH --address 0x.. --amount 0.1

mod commands;
mod logging;

use clap::Parser;
use commands::{Cli, Mode};

fn main() {
    logging::init_logging();
    println!("Easy Wallet v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let result = match cli.mode {
        Some(Mode::Create) => commands::create_seed(&cli),
        Some(Mode::Interactive) => commands::run_interactive(&cli),
        None => commands::run_once(&cli),
    };

    // Failures are reported on stdout; the exit status stays 0.
    if let Err(e) = result {
        println!("Error: {e}");
    }
}
