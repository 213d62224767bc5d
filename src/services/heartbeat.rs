use anyhow::Result;
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::config::HeartbeatConfig;

/// Periodic request-log maintenance heartbeat. Does no work beyond logging.
pub struct Heartbeat {
    config: HeartbeatConfig,
}

impl Heartbeat {
    #[must_use]
    pub const fn new(config: HeartbeatConfig) -> Self {
        Self { config }
    }

    /// Starts the job and returns its scheduler; shut it down to stop the timer.
    pub async fn start(&self) -> Result<Option<JobScheduler>> {
        if !self.config.enabled {
            info!("Heartbeat is disabled in config");
            return Ok(None);
        }

        let sched = JobScheduler::new().await?;
        let period = interval(self.config.interval_minutes)?;

        let job = Job::new_repeated_async(period, |_uuid, _lock| {
            Box::pin(async move {
                info!("{}", maintenance_message(Local::now()));
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!(
            "Heartbeat running every {} minute(s)",
            self.config.interval_minutes
        );
        Ok(Some(sched))
    }
}

fn interval(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow::anyhow!("Heartbeat interval of {minutes} minutes is too large"))
}

#[must_use]
pub fn maintenance_message(at: DateTime<Local>) -> String {
    format!(
        "Request logs maintenance check completed at {}",
        at.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_includes_timestamp() {
        let now = Local::now();
        let msg = maintenance_message(now);
        assert!(msg.starts_with("Request logs maintenance check completed at "));
        assert!(msg.ends_with(&now.to_rfc3339()));
    }

    #[test]
    fn interval_converts_minutes() {
        assert_eq!(interval(60).unwrap(), Duration::from_secs(3600));
        assert!(interval(u64::MAX).is_err());
    }

    #[tokio::test]
    async fn disabled_heartbeat_has_no_scheduler() {
        let heartbeat = Heartbeat::new(HeartbeatConfig {
            enabled: false,
            interval_minutes: 60,
        });
        assert!(heartbeat.start().await.unwrap().is_none());
    }
}
