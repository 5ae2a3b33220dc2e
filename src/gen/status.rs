//! Workflow status and health assignment.

use crate::gen::catalog::{status_named, ACTIVE_STATUSES, HEALTH_STATUSES, STATUSES};
use crate::gen::stream::DataStream;
use crate::models::jira::Status;

/// Assign a status from the banded distribution.
///
/// Historical issues (end year before the current year) land 70% Done,
/// 15% Cancelled, 10% carried forward into an active non-initial status,
/// and 5% anywhere active. In-flight issues draw uniformly from the full
/// catalog.
pub fn assign_status(historical: bool, stream: &mut DataStream) -> &'static Status {
    if !historical {
        return stream.pick(&STATUSES);
    }
    let roll = stream.next_f64();
    if roll < 0.70 {
        status_named("Done")
    } else if roll < 0.85 {
        status_named("Cancelled")
    } else if roll < 0.95 {
        // Carried forward: still active, but past the initial status.
        stream.pick(&ACTIVE_STATUSES[1..])
    } else {
        stream.pick(&ACTIVE_STATUSES)
    }
}

/// Health is Complete exactly when the issue is Done; everything else draws
/// from the non-terminal health labels.
pub fn health_for(status: &Status, stream: &mut DataStream) -> &'static str {
    if status.name == "Done" {
        "Complete"
    } else {
        *stream.pick(&HEALTH_STATUSES[..3])
    }
}
