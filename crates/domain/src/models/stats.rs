//! Circle statistics.

use serde::Serialize;

/// Aggregate task and membership counts for one circle.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CircleStatsResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub open_tasks: i64,
    /// Percentage 0-100, rounded; 0 for a circle with no tasks.
    pub completion_rate: i64,
    pub member_count: i64,
}

impl CircleStatsResponse {
    /// Builds the aggregate from raw counts, guarding the zero-task case.
    pub fn from_totals(total_tasks: i64, completed_tasks: i64, member_count: i64) -> Self {
        let completion_rate = if total_tasks == 0 {
            0
        } else {
            ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as i64
        };
        Self {
            total_tasks,
            completed_tasks,
            open_tasks: total_tasks - completed_tasks,
            completion_rate,
            member_count,
        }
    }
}
