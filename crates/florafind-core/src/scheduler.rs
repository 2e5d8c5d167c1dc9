//! Timer Scheduler
//!
//! One-shot jobs keyed by [`TaskId`]. The scheduler only keeps the schedule;
//! a driver (browser timeouts, or a test loop) calls [`TimerScheduler::take_due`].

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::storage::ReminderId;
use crate::toast::ToastId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TimerJob {
    Reminder(ReminderId),
    DemoNotification { title: String, body: String },
    DismissToast(ToastId),
    CheckAchievements,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub due: DateTime<Utc>,
    pub job: TimerJob,
}

#[derive(Debug, Default)]
pub struct TimerScheduler {
    next_id: u64,
    tasks: BTreeMap<TaskId, ScheduledTask>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&mut self, due: DateTime<Utc>, job: TimerJob) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        tracing::debug!(task = id.0, %due, ?job, "timer scheduled");
        self.tasks.insert(id, ScheduledTask { id, due, job });
        id
    }

    pub fn after(&mut self, now: DateTime<Utc>, delay: Duration, job: TimerJob) -> TaskId {
        self.at(now + delay, job)
    }

    /// Returns false when the task already fired or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let removed = self.tasks.remove(&id).is_some();
        if removed {
            tracing::debug!(task = id.0, "timer cancelled");
        }
        removed
    }

    pub fn reschedule(&mut self, id: TaskId, due: DateTime<Utc>) -> Result<()> {
        let task = self.tasks.get_mut(&id).ok_or(Error::UnknownTask(id.0))?;
        task.due = due;
        Ok(())
    }

    pub fn get(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.get(&id)
    }

    /// Remove and return every task due at or before `now`, soonest first.
    /// Ties keep registration order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTask> {
        let due_ids: Vec<TaskId> = self
            .tasks
            .values()
            .filter(|t| t.due <= now)
            .map(|t| t.id)
            .collect();
        let mut fired: Vec<ScheduledTask> = due_ids
            .into_iter()
            .filter_map(|id| self.tasks.remove(&id))
            .collect();
        // stable sort over id-ordered input
        fired.sort_by_key(|t| t.due);
        fired
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.tasks.values().map(|t| t.due).min()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Id of the pending task running `job`, if any
    pub fn find(&self, job: &TimerJob) -> Option<TaskId> {
        self.tasks.values().find(|t| &t.job == job).map(|t| t.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 5, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut sched = TimerScheduler::new();
        let id = sched.after(t0(), Duration::seconds(5), TimerJob::CheckAchievements);
        assert!(sched.cancel(id));
        assert!(!sched.cancel(id));
        assert!(sched.take_due(t0() + Duration::days(1)).is_empty());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_take_due_in_due_order() {
        let mut sched = TimerScheduler::new();
        let late = sched.after(t0(), Duration::seconds(30), TimerJob::DismissToast(ToastId(1)));
        let early = sched.after(t0(), Duration::seconds(5), TimerJob::CheckAchievements);
        let tie = sched.after(t0(), Duration::seconds(5), TimerJob::DismissToast(ToastId(2)));
        let future = sched.after(t0(), Duration::hours(1), TimerJob::CheckAchievements);

        let fired: Vec<TaskId> = sched
            .take_due(t0() + Duration::seconds(30))
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(fired, vec![early, tie, late]);
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.next_due(), Some(t0() + Duration::hours(1)));
        assert!(sched.get(future).is_some());
    }

    #[test]
    fn test_reschedule_moves_due_time() {
        let mut sched = TimerScheduler::new();
        let id = sched.after(t0(), Duration::seconds(5), TimerJob::CheckAchievements);
        sched.reschedule(id, t0() + Duration::minutes(10)).unwrap();
        assert!(sched.take_due(t0() + Duration::seconds(5)).is_empty());
        assert_eq!(sched.take_due(t0() + Duration::minutes(10)).len(), 1);

        let err = sched.reschedule(id, t0()).unwrap_err();
        assert!(matches!(err, Error::UnknownTask(n) if n == id.0));
    }
}
