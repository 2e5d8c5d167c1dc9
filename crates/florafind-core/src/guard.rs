//! Stale-response guards
//!
//! Every request is issued a [`Ticket`]. A response may only be applied while
//! its ticket is the newest one for the target and the navigation context it
//! was issued in is still current.

use std::collections::HashMap;

use crate::section::{NavContext, SectionController};

/// Where a response ends up being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    ChatLog,
    Garden,
    Challenges,
    Leaderboard,
    UpcomingTasks,
    Stats,
}

impl RenderTarget {
    /// Targets whose content outlives section switches
    fn is_append_only(&self) -> bool {
        matches!(self, RenderTarget::ChatLog)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub target: RenderTarget,
    pub context: NavContext,
    seq: u64,
}

#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<RenderTarget, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, target: RenderTarget, context: NavContext) -> Ticket {
        self.next_seq += 1;
        self.latest.insert(target, self.next_seq);
        Ticket {
            target,
            context,
            seq: self.next_seq,
        }
    }

    pub fn accept(&self, ticket: &Ticket, sections: &SectionController) -> bool {
        if ticket.target.is_append_only() {
            return true;
        }
        let newest = self.latest.get(&ticket.target) == Some(&ticket.seq);
        let accepted = newest && sections.is_current(ticket.context);
        if !accepted {
            tracing::debug!(target_kind = ?ticket.target, seq = ticket.seq, newest, "discarding stale response");
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;

    #[test]
    fn test_newer_request_supersedes_older() {
        let mut sections = SectionController::new();
        let ctx = sections.activate(Section::Community).context;
        let mut tracker = RequestTracker::new();

        let first = tracker.begin(RenderTarget::Leaderboard, ctx);
        let challenges = tracker.begin(RenderTarget::Challenges, ctx);
        let second = tracker.begin(RenderTarget::Leaderboard, ctx);

        assert!(!tracker.accept(&first, &sections));
        assert!(tracker.accept(&second, &sections));
        assert!(tracker.accept(&challenges, &sections));
    }

    #[test]
    fn test_navigation_rejects_old_context() {
        let mut sections = SectionController::new();
        let ctx = sections.activate(Section::Garden).context;
        let mut tracker = RequestTracker::new();
        let ticket = tracker.begin(RenderTarget::Garden, ctx);

        sections.activate(Section::Community);
        assert!(!tracker.accept(&ticket, &sections));

        // coming back opens a new context; the old ticket stays stale
        sections.activate(Section::Garden);
        assert!(!tracker.accept(&ticket, &sections));
    }

    #[test]
    fn test_chat_log_always_accepted() {
        let mut sections = SectionController::new();
        let ctx = sections.context();
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(RenderTarget::ChatLog, ctx);
        let _second = tracker.begin(RenderTarget::ChatLog, ctx);
        sections.activate(Section::Calendar);
        assert!(tracker.accept(&first, &sections));
    }
}
