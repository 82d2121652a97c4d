//! Health probing across both backends and the metadata repository.

use serde_json::json;
use tracing::debug;

use tagcache_core::HealthReport;

use crate::manager::CacheManager;

impl CacheManager {
    /// Produces the tri-state health verdict.
    ///
    /// - `healthy`: the remote backend answers a liveness probe and its
    ///   stats can be gathered.
    /// - `degraded`: no remote backend is configured; the fallback map
    ///   is the intended mode. Expected and non-alerting.
    /// - `unhealthy`: a remote backend is configured but unreachable.
    ///   This should page.
    ///
    /// Metadata repository reachability never changes the verdict: a
    /// shrunken tag index or missing hit stats is a detail, reported in
    /// `details.metadata` so the discrepancy is visible, not hidden.
    pub async fn check_health(&self) -> HealthReport {
        let metadata = match self.metadata() {
            None => json!({ "configured": false }),
            Some(store) => match store.aggregate_hit_stats().await {
                Ok(stats) => json!({
                    "configured": true,
                    "reachable": true,
                    "trackedKeys": stats.total_rows,
                    "totalHits": stats.total_hits,
                }),
                Err(e) => json!({
                    "configured": true,
                    "reachable": false,
                    "error": e.to_string(),
                }),
            },
        };

        let report = match self.remote() {
            None => HealthReport::degraded(json!({
                "backend": "fallback",
                "totalKeys": self.fallback().len(),
                "metadata": metadata,
            })),
            Some(remote) => match remote.ping().await {
                Ok(()) => match remote.dbsize().await {
                    Ok(total_keys) => HealthReport::healthy(json!({
                        "backend": "remote",
                        "totalKeys": total_keys,
                        "metadata": metadata,
                    })),
                    Err(e) => HealthReport::unhealthy(json!({
                        "backend": "remote",
                        "error": format!("stats unavailable: {e}"),
                        "fallbackKeys": self.fallback().len(),
                        "metadata": metadata,
                    })),
                },
                Err(e) => HealthReport::unhealthy(json!({
                    "backend": "remote",
                    "error": e.to_string(),
                    "fallbackKeys": self.fallback().len(),
                    "metadata": metadata,
                })),
            },
        };

        debug!(status = %report.status, "health check completed");
        report
    }
}
