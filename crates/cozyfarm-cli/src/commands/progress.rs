//! Check-in and mood refresh commands.

use std::time::Duration;

use cozyfarm_core::RefreshTask;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use super::{open_farm, print_json};

pub fn check_in(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (mut farm, _) = open_farm()?;
    let reward = farm.check_in(id)?;
    print_json(&json!({
        "reward": reward,
        "animal": farm.animal_by_id(id),
        "coins": farm.coins(),
    }))
}

pub fn can_check_in(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (farm, _) = open_farm()?;
    print_json(&json!({ "canCheckIn": farm.can_check_in(id) }))
}

pub fn refresh() -> Result<(), Box<dyn std::error::Error>> {
    // Opening the farm already refreshes; a second pass reports what is left.
    let (mut farm, _) = open_farm()?;
    let changed = farm.refresh_states()?;
    print_json(&json!({
        "changed": changed,
        "animals": farm.animals(),
    }))
}

pub fn watch(interval_secs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let (farm, config) = open_farm()?;
    let interval = Duration::from_secs(interval_secs.unwrap_or(config.refresh.interval_secs).max(1));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut events = farm.subscribe();
        let farm = farm.into_shared();
        let handle = RefreshTask::spawn(farm, interval);
        eprintln!("Watching the farm every {}s, Ctrl-C to stop", interval.as_secs());

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                event = events.recv() => match event {
                    Ok(event) => println!("{}", serde_json::to_string(&event)?),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        handle.shutdown().await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
