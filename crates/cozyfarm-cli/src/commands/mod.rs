pub mod animal;
pub mod coins;
pub mod config;
pub mod progress;
pub mod user;

use cozyfarm_core::{Config, Database, Farm};
use serde::Serialize;

/// Open the farm stored in the data directory with the saved configuration.
pub fn open_farm() -> Result<(Farm, Config), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let farm = Farm::open(&config, config.calendar()?, Box::new(db))?;
    Ok((farm, config))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
