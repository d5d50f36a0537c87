//! Multi-level progress tracking, ported in meaning from
//! `original_source/nifi_mcp_server/workflows/core/progress_tracker.py`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Preparing,
    Running,
    Completed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    /// Serializes as `"error"`, not `"failed"` — spec.md §8 scenario 4
    /// asserts the workflow result's top-level `status` is `"error"`
    /// (distinct from a step's own `status ∈ {..., failed, ...}`).
    #[serde(rename = "error")]
    Failed,
    /// Additive beyond the original's pending/running/completed/failed
    /// (SPEC_FULL §5 item 3); set only when a node's `post` returns
    /// `Navigation::Paused`.
    Paused,
}

#[derive(Debug, Clone)]
struct StepRecord {
    description: String,
    status: StepStatus,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    error_message: Option<String>,
    action_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepDetail {
    pub name: String,
    pub description: String,
    pub status: StepStatus,
    pub duration_seconds: Option<f64>,
    pub action_count: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub workflow_name: String,
    pub workflow_status: WorkflowStatus,
    pub current_step: Option<String>,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub failed_steps: usize,
    pub running_steps: usize,
    pub progress_percentage: f64,
    pub total_duration_seconds: Option<f64>,
    pub error_message: Option<String>,
}

pub struct ProgressTracker {
    workflow_name: String,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    current_step: Option<String>,
    steps: HashMap<String, StepRecord>,
    step_order: Vec<String>,
    workflow_status: WorkflowStatus,
    error_message: Option<String>,
}

impl ProgressTracker {
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            start_time: None,
            end_time: None,
            current_step: None,
            steps: HashMap::new(),
            step_order: Vec::new(),
            workflow_status: WorkflowStatus::Pending,
            error_message: None,
        }
    }

    pub fn start_workflow(&mut self, now: DateTime<Utc>) {
        self.start_time = Some(now);
        self.workflow_status = WorkflowStatus::Running;
        log::info!(target: "mw_workflow_engine::progress", "workflow started: {}", self.workflow_name);
    }

    pub fn complete_workflow(&mut self, now: DateTime<Utc>, success: bool, error_message: Option<String>) {
        self.end_time = Some(now);
        self.workflow_status = if success { WorkflowStatus::Completed } else { WorkflowStatus::Failed };
        self.error_message = error_message;
        log::info!(
            target: "mw_workflow_engine::progress",
            "workflow {}: {} (duration={:?}s)",
            if success { "completed" } else { "failed" },
            self.workflow_name,
            self.get_total_duration(now)
        );
    }

    pub fn pause_workflow(&mut self) {
        self.workflow_status = WorkflowStatus::Paused;
    }

    pub fn start_step(&mut self, step_name: &str, description: &str, now: DateTime<Utc>) {
        self.current_step = Some(step_name.to_string());
        if !self.steps.contains_key(step_name) {
            self.step_order.push(step_name.to_string());
        }
        self.steps.insert(
            step_name.to_string(),
            StepRecord {
                description: description.to_string(),
                status: StepStatus::Running,
                start_time: now,
                end_time: None,
                error_message: None,
                action_count: 0,
            },
        );
        log::info!(target: "mw_workflow_engine::progress", "step started: {step_name}");
    }

    pub fn update_step_status(
        &mut self,
        step_name: &str,
        status: StepStatus,
        error_message: Option<String>,
        now: DateTime<Utc>,
    ) {
        if !self.steps.contains_key(step_name) {
            self.step_order.push(step_name.to_string());
            self.steps.insert(
                step_name.to_string(),
                StepRecord {
                    description: String::new(),
                    status,
                    start_time: now,
                    end_time: None,
                    error_message: None,
                    action_count: 0,
                },
            );
        }
        let record = self.steps.get_mut(step_name).expect("just inserted if absent");
        record.status = status;
        if matches!(status, StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped) {
            record.end_time = Some(now);
        }
        if error_message.is_some() {
            record.error_message = error_message;
        }
        if self.current_step.as_deref() == Some(step_name)
            && matches!(status, StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped)
        {
            self.current_step = None;
        }
    }

    pub fn increment_step_actions(&mut self, step_name: &str) {
        if let Some(record) = self.steps.get_mut(step_name) {
            record.action_count += 1;
        }
    }

    /// Overwrites the step's recorded action count, used to sync an
    /// `ActionBudget`'s final tally onto the step after `exec` returns
    /// rather than incrementing one-by-one from outside the node.
    pub fn set_step_action_count(&mut self, step_name: &str, count: usize) {
        if let Some(record) = self.steps.get_mut(step_name) {
            record.action_count = count;
        }
    }

    pub fn get_step_duration(&self, step_name: &str, now: DateTime<Utc>) -> Option<f64> {
        let record = self.steps.get(step_name)?;
        match record.end_time {
            Some(end) => Some((end - record.start_time).num_milliseconds() as f64 / 1000.0),
            None if record.status == StepStatus::Running => {
                Some((now - record.start_time).num_milliseconds() as f64 / 1000.0)
            }
            None => None,
        }
    }

    pub fn get_total_duration(&self, now: DateTime<Utc>) -> Option<f64> {
        let start = self.start_time?;
        let end = self.end_time.unwrap_or(now);
        Some((end - start).num_milliseconds() as f64 / 1000.0)
    }

    pub fn get_progress_summary(&self, now: DateTime<Utc>) -> ProgressSummary {
        let total_steps = self.steps.len();
        let completed_steps = self.steps.values().filter(|s| s.status == StepStatus::Completed).count();
        let failed_steps = self.steps.values().filter(|s| s.status == StepStatus::Failed).count();
        let running_steps = self.steps.values().filter(|s| s.status == StepStatus::Running).count();
        let progress_percentage = if total_steps > 0 {
            (completed_steps as f64 / total_steps as f64) * 100.0
        } else {
            0.0
        };
        ProgressSummary {
            workflow_name: self.workflow_name.clone(),
            workflow_status: self.workflow_status,
            current_step: self.current_step.clone(),
            total_steps,
            completed_steps,
            failed_steps,
            running_steps,
            progress_percentage: (progress_percentage * 10.0).round() / 10.0,
            total_duration_seconds: self.get_total_duration(now),
            error_message: self.error_message.clone(),
        }
    }

    pub fn get_step_details(&self, now: DateTime<Utc>) -> Vec<StepDetail> {
        self.step_order
            .iter()
            .filter_map(|name| {
                let record = self.steps.get(name)?;
                Some(StepDetail {
                    name: name.clone(),
                    description: record.description.clone(),
                    status: record.status,
                    duration_seconds: self.get_step_duration(name, now),
                    action_count: record.action_count,
                    error_message: record.error_message.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn tracks_step_lifecycle_and_summary_counts() {
        let t0 = Utc::now();
        let mut tracker = ProgressTracker::new("demo");
        tracker.start_workflow(t0);
        tracker.start_step("s1", "first step", t0);
        tracker.increment_step_actions("s1");
        tracker.update_step_status("s1", StepStatus::Completed, None, t0 + Duration::seconds(2));
        tracker.complete_workflow(t0 + Duration::seconds(2), true, None);

        let summary = tracker.get_progress_summary(t0 + Duration::seconds(2));
        assert_eq!(summary.total_steps, 1);
        assert_eq!(summary.completed_steps, 1);
        assert_eq!(summary.workflow_status, WorkflowStatus::Completed);

        let details = tracker.get_step_details(t0 + Duration::seconds(2));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].action_count, 1);
        assert_eq!(details[0].duration_seconds, Some(2.0));
    }

    #[test]
    fn step_order_is_preserved_across_reinsertion() {
        let t0 = Utc::now();
        let mut tracker = ProgressTracker::new("demo");
        tracker.start_step("a", "", t0);
        tracker.start_step("b", "", t0);
        tracker.start_step("a", "", t0);
        let details = tracker.get_step_details(t0);
        assert_eq!(details.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
