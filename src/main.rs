use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use bank_simulator::{export_accounts_csv, BankPolicy, CommandProcessor, VERSION};

const USAGE: &str = "Usage: bank-simulator [COMMANDS_FILE] [--policy FILE] [--csv FILE]";

#[derive(Debug, Default)]
struct Args {
    commands: Option<PathBuf>,
    policy: Option<PathBuf>,
    csv: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--policy" => {
                let path = iter.next().context("--policy requires a file path")?;
                args.policy = Some(PathBuf::from(path));
            }
            "--csv" => {
                let path = iter.next().context("--csv requires a file path")?;
                args.csv = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => bail!("Unknown option: {}\n{}", other, USAGE),
            other => {
                if args.commands.is_some() {
                    bail!("Only one commands file may be given\n{}", USAGE);
                }
                args.commands = Some(PathBuf::from(other));
            }
        }
    }

    Ok(Some(args))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args()? else {
        println!("bank-simulator {}\n{}", VERSION, USAGE);
        return Ok(());
    };

    let policy = match &args.policy {
        Some(path) => BankPolicy::from_file(path)?,
        None => BankPolicy::default(),
    };
    log::debug!("Using policy: {:?}", policy);

    let input = match &args.commands {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read commands file: {:?}", path))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read commands from stdin")?;
            buffer
        }
    };

    let mut processor = CommandProcessor::new(policy);
    for line in processor.run(input.lines()) {
        println!("{}", line);
    }

    if let Some(path) = &args.csv {
        export_accounts_csv(processor.bank(), path)?;
        log::info!("Exported {} account(s) to {:?}", processor.bank().count(), path);
    }

    Ok(())
}
