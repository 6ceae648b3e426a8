//! Background task that periodically reclassifies animal states.
//!
//! The first tick fires immediately, so spawning the task also performs the
//! startup refresh. Each tick takes the farm lock for the whole pass.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::farm::SharedFarm;

/// Periodic state refresh
pub struct RefreshTask {
    farm: SharedFarm,
    interval: Duration,
    shutdown_rx: broadcast::Receiver<()>,
    /// Completed passes, for logging
    ticks: u64,
}

impl RefreshTask {
    /// Spawn the refresh loop on the current runtime.
    ///
    /// Intervals shorter than one millisecond are raised to one millisecond.
    pub fn spawn(farm: SharedFarm, interval: Duration) -> RefreshHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = Self {
            farm,
            interval: interval.max(Duration::from_millis(1)),
            shutdown_rx,
            ticks: 0,
        };
        let join = tokio::spawn(async move {
            task.run().await;
        });
        RefreshHandle {
            shutdown_tx,
            join: Some(join),
        }
    }

    async fn run(mut self) {
        info!(interval_ms = self.interval.as_millis() as u64, "refresh task started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!(ticks = self.ticks, "refresh task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.ticks += 1;
                    let result = self.farm.lock().await.refresh_states();
                    match result {
                        Ok(0) => {}
                        Ok(changed) => debug!(changed, tick = self.ticks, "animal states refreshed"),
                        Err(e) => error!(error = %e, "state refresh failed"),
                    }
                }
            }
        }
    }
}

/// Owner of a running [`RefreshTask`]. Dropping it aborts the task.
pub struct RefreshHandle {
    shutdown_tx: broadcast::Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stop the loop and wait for it to finish its current pass.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                error!(error = %e, "refresh task ended abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::calendar::{Calendar, ManualClock};
    use crate::farm::Farm;
    use crate::species::AnimalType;
    use crate::state::AnimalState;
    use crate::storage::Config;

    fn shared_farm() -> (SharedFarm, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap(),
        ));
        let farm = Farm::in_memory(&Config::default(), Calendar::new(clock.clone())).unwrap();
        (farm.into_shared(), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop() {
        let (farm, _) = shared_farm();
        let handle = RefreshTask::spawn(farm, Duration::from_secs(60));
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_refreshes_immediately() {
        let (farm, _) = shared_farm();
        let id = farm
            .lock()
            .await
            .create_animal_and_habit(AnimalType::Bear, "Bruno", "Stretch")
            .unwrap();

        let handle = RefreshTask::spawn(farm.clone(), Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(
            farm.lock().await.animal_by_id(&id).unwrap().state,
            AnimalState::Resting
        );
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_reclassify_lapsed_animals() {
        let (farm, clock) = shared_farm();
        let id = {
            let mut farm = farm.lock().await;
            let id = farm
                .create_animal_and_habit(AnimalType::Cat, "Mochi", "Read")
                .unwrap();
            farm.check_in(&id).unwrap();
            id
        };

        let handle = RefreshTask::spawn(farm.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            farm.lock().await.animal_by_id(&id).unwrap().state,
            AnimalState::Neutral
        );

        clock.advance_days(4);
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(
            farm.lock().await.animal_by_id(&id).unwrap().state,
            AnimalState::Resting
        );

        handle.shutdown().await;
    }
}
