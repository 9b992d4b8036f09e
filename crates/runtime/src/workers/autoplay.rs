//! Autonomous play: step, pause, repeat until the game ends.
//!
//! A loop belongs to the epoch it was spawned under. Every state write goes
//! through the controller's epoch check, so once the epoch moves on the loop
//! can no longer change anything and winds down at its next checkpoint.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{AutoPlayState, StopReason};
use crate::controller::{Commit, Shared};
use crate::events::SessionEvent;

use super::StepExecutor;

pub(crate) struct AutoPlayLoop {
    shared: Arc<Shared>,
    epoch: u64,
    executor: Arc<StepExecutor>,
    steps: u64,
}

impl AutoPlayLoop {
    pub(crate) fn spawn(
        shared: Arc<Shared>,
        epoch: u64,
        executor: Arc<StepExecutor>,
    ) -> JoinHandle<()> {
        let worker = Self {
            shared,
            epoch,
            executor,
            steps: 0,
        };
        tokio::spawn(worker.run())
    }

    async fn run(mut self) {
        debug!(
            "Autoplay loop started for session {} at epoch {}",
            self.executor.session(),
            self.epoch
        );

        let reason = self.drive().await;

        if self
            .shared
            .set_autoplay(self.epoch, AutoPlayState::Stopped(reason.clone()))
        {
            info!("Autoplay stopped after {} steps: {}", self.steps, reason);
            self.shared.publish(SessionEvent::AutoPlayStopped { reason });
        } else {
            debug!("Autoplay loop for epoch {} wound down", self.epoch);
        }
    }

    async fn drive(&mut self) -> StopReason {
        loop {
            if let Some(limit) = self.shared.max_steps
                && self.steps >= limit
            {
                return StopReason::StepLimit;
            }

            if !self.shared.set_autoplay(self.epoch, AutoPlayState::Requesting) {
                return StopReason::Cancelled;
            }

            match self.executor.advance().await {
                Ok(view) => match self.shared.commit(self.epoch, view) {
                    Commit::Applied { terminal: true } => {
                        self.steps += 1;
                        return StopReason::Finished;
                    }
                    Commit::Applied { terminal: false } => self.steps += 1,
                    Commit::Stale => return StopReason::Cancelled,
                },
                Err(err) => {
                    return if self.shared.record_failure(self.epoch, &err) {
                        StopReason::Failed
                    } else {
                        StopReason::Cancelled
                    };
                }
            }

            if !self.pause().await {
                return StopReason::Cancelled;
            }
        }
    }

    /// Wait out the configured delay. Returns `false` if the epoch moved on
    /// in the meantime.
    async fn pause(&self) -> bool {
        if !self.shared.set_autoplay(self.epoch, AutoPlayState::Pausing) {
            return false;
        }

        let epoch = self.epoch;
        let delay = self.shared.autoplay_delay();
        let mut watch = self.shared.watch();
        let superseded = async move {
            // an error means the controller is gone
            let _ = watch.wait_for(|state| state.epoch != epoch).await;
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => self.shared.epoch() == epoch,
            _ = superseded => false,
        }
    }
}
