use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use chrono::Utc;

use crate::modules::reports::repositories::MetadataRepository;

/// Background job marking overdue report metadata as expired.
///
/// The audit trail is append-only apart from this one status transition
/// (generated -> expired); the sweep is the only writer of it.
pub struct ExpirationSweep {
    metadata_repo: Arc<dyn MetadataRepository>,
    period: Duration,
}

impl ExpirationSweep {
    pub fn new(metadata_repo: Arc<dyn MetadataRepository>, period: Duration) -> Self {
        Self {
            metadata_repo,
            period,
        }
    }

    /// Run forever; spawn as a tokio task from main
    pub async fn start(self: Arc<Self>) {
        info!(period_secs = self.period.as_secs(), "Starting report metadata expiry sweep");

        let mut ticker = interval(self.period);

        loop {
            ticker.tick().await;

            match self.metadata_repo.expire_overdue(Utc::now()).await {
                Ok(expired_count) => {
                    if expired_count > 0 {
                        info!(expired_count, "Expired report metadata records");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error expiring report metadata");
                }
            }
        }
    }
}
