use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health probe response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Simple health service that can be used by any API transport.
///
/// There is no backing store to probe, so liveness of the process is the whole answer.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy, stamped with the current time.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "NLQ is alive".into(),
            timestamp: Utc::now(),
        }
    }
}
