use tracing::{info, warn};

use crate::api::{ClientResult, StatusSource};
use crate::models::StatusSnapshot;

/// Reads the current status summary.
pub async fn fetch_status<S>(source: &S) -> ClientResult<StatusSnapshot>
where
    S: StatusSource,
{
    source.fetch_status().await
}

/// Asks the backend to regenerate the summary, then reads it.
///
/// The status endpoint is only called after the recompute call succeeded.
pub async fn recompute_then_fetch<S>(source: &S) -> ClientResult<StatusSnapshot>
where
    S: StatusSource,
{
    match source.trigger_recompute().await {
        Ok(ack) => {
            info!(message = ?ack.message, "recompute acknowledged");
            source.fetch_status().await
        }
        Err(err) => {
            warn!(status = ?err.status(), "recompute failed: {err}");
            Err(err)
        }
    }
}
