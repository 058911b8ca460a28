// This is my entry point for the staging wallet CLI
use clap::Parser;
use log::{error, LevelFilter};
use staging_wallet::{
    Command, Config, FeeCalculator, Opt, TransactionStager, WalletDb, FACTOSHIS_PER_FACTOID,
};
use std::process;

fn main() {
    // Info level shows each state change without the store internals
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(path) = opt.wallet {
        config = config.with_wallet_path(path);
    }

    // I open the wallet database once per invocation and close it on the way out
    let db = WalletDb::open(config.get_wallet_path())?;
    let fees = FeeCalculator::new(config.get_fee_mode())?;
    let stager = TransactionStager::new(db.staging_store().clone(), fees);

    let result = run_command(opt.command, &db, &stager);
    db.close()?;
    result
}

// Each command maps onto one staging or key store operation
fn run_command(
    command: Command,
    db: &WalletDb,
    stager: &TransactionStager,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallets = db.wallets();
    match command {
        Command::NewTx { name } => {
            stager.new_transaction(&name)?;
        }
        Command::RmTx { name } => {
            stager.remove_transaction(&name)?;
        }
        Command::ListTxs => {
            for name in stager.list_transactions()? {
                println!("{name}");
            }
        }
        Command::GetTx { name } => {
            let report = stager.describe_transaction(&name)?;
            let tx = &report.transaction;
            println!("Transaction: {} ({})", tx.get_name(), report.state);
            println!("Timestamp: {}", tx.get_timestamp());
            for input in tx.get_inputs() {
                println!(
                    "  input     {} {}",
                    input.get_address(),
                    input.get_amount().to_decimal_string()
                );
            }
            for output in tx.get_outputs() {
                println!(
                    "  output    {} {}",
                    output.get_address(),
                    output.get_amount().to_decimal_string()
                );
            }
            for ec_output in tx.get_ec_outputs() {
                println!(
                    "  ec output {} {}",
                    ec_output.get_address(),
                    ec_output.get_amount().to_decimal_string()
                );
            }
            // I show both what the shape owes now and what was actually folded in
            match tx.get_settled_fee() {
                Some(settled) => println!(
                    "Fee: {} (settled {})",
                    report.fee.to_decimal_string(),
                    settled.to_decimal_string()
                ),
                None => println!("Fee: {} (not settled)", report.fee.to_decimal_string()),
            }
            // The difference is signed, so I format it by hand instead of through Amount
            let magnitude = report.difference.unsigned_abs();
            let per_factoid = u128::from(FACTOSHIS_PER_FACTOID);
            println!(
                "Balance difference: {}{}.{:08}",
                if report.difference < 0 { "-" } else { "" },
                magnitude / per_factoid,
                magnitude % per_factoid
            );
        }
        Command::AddTxInput {
            name,
            address,
            amount,
        } => {
            stager.add_input(wallets, &name, &address, amount)?;
        }
        Command::AddTxOutput {
            name,
            address,
            amount,
        } => {
            stager.add_output(wallets, &name, &address, amount)?;
        }
        Command::AddTxEcOutput {
            name,
            address,
            amount,
        } => {
            stager.add_ec_output(wallets, &name, &address, amount)?;
        }
        Command::AddTxFee { name, address } => {
            let fee = stager.add_fee(wallets, &name, &address)?;
            println!("Added fee of {}", fee.to_decimal_string());
        }
        Command::SubTxFee { name, address } => {
            let fee = stager.sub_fee(wallets, &name, &address)?;
            println!("Subtracted fee of {}", fee.to_decimal_string());
        }
        Command::SignTx { name } => {
            stager.sign(wallets, &name)?;
        }
        Command::ComposeTx { name } => {
            let payload = stager.compose(&name)?;
            println!("{}", String::from_utf8_lossy(&payload));
        }
        Command::GenerateAddress { kind, name } => {
            let address = wallets.create_wallet(kind.0, &name)?;
            println!("{address}");
        }
        Command::ImportAddress { name, secret } => {
            let (_, address) = wallets.import_secret(&name, &secret)?;
            println!("{address}");
        }
        Command::GetAddresses => {
            for entry in wallets.get_addresses()? {
                println!("{} {}", entry.name, entry.address);
            }
        }
        Command::FeeStatus => {
            println!("{}", stager.get_fee_calculator().get_config_summary());
        }
    }
    Ok(())
}
