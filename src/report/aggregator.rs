use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Activity;

/// Figures computed from one window of activity records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total_hours: Decimal,
    pub total_budget: Decimal,
    pub hours_by_user: HashMap<Uuid, Decimal>,
}

impl ActivitySummary {
    /// Contributor ids in a stable order, for batch lookups.
    pub fn contributor_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.hours_by_user.keys().copied().collect();
        ids.sort();
        ids
    }
}

/// Single pass over `activities`. Every record counts exactly once towards
/// both totals and towards its user's hours.
pub fn aggregate(activities: &[Activity]) -> ActivitySummary {
    let mut summary = ActivitySummary::default();

    for activity in activities {
        summary.total_hours += activity.total;
        summary.total_budget += activity.value;

        let hours = summary.hours_by_user.entry(activity.user_id).or_insert(Decimal::ZERO);
        *hours += activity.total;
    }

    summary
}
