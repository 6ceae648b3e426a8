use clap::Subcommand;
use serde_json::json;

use super::{open_farm, print_json};

#[derive(Subcommand)]
pub enum CoinsAction {
    /// Show the current balance
    Balance,
    /// Credit coins
    Add {
        amount: u64,
    },
    /// Spend coins; exits with status 1 when the balance is too low
    Spend {
        amount: u64,
    },
}

pub fn run(action: CoinsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut farm, _) = open_farm()?;
    match action {
        CoinsAction::Balance => {
            print_json(&json!({ "coins": farm.coins() }))?;
        }
        CoinsAction::Add { amount } => {
            if farm.user().is_none() {
                return Err("no user yet, run `init` first".into());
            }
            farm.add_coins(amount)?;
            print_json(&json!({ "coins": farm.coins() }))?;
        }
        CoinsAction::Spend { amount } => {
            let spent = farm.spend_coins(amount)?;
            print_json(&json!({ "spent": spent, "coins": farm.coins() }))?;
            if !spent {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
