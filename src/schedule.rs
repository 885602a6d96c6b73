// Host-side timer for overlay redraws.
// Collects `NextTick` requests and says when the overlay is due again.

use std::time::Instant;

use crate::overlay::{NextTick, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    deadline: Instant,
    region: Region,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    pending: Option<Pending>,
}

impl TickScheduler {
    /// Starts with a full redraw due at `now`, so the first frame gets painted.
    pub fn new(now: Instant) -> Self {
        Self { pending: Some(Pending { deadline: now, region: Region::Full }) }
    }

    /// Merge a request: the earlier deadline wins, regions are unioned.
    pub fn schedule(&mut self, next: NextTick, now: Instant) {
        let NextTick::After { delay, region } = next else {
            return;
        };
        let deadline = now + delay;
        self.pending = Some(match self.pending {
            None => Pending { deadline, region },
            Some(p) => Pending { deadline: p.deadline.min(deadline), region: p.region.union(region) },
        });
    }

    /// The region to repaint if a request has come due; clears it.
    pub fn take_due(&mut self, now: Instant) -> Option<Region> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.region)
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}
