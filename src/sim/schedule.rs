//! Tick-driven scheduled task queue
//!
//! The original prototype leaned on engine timers whose callbacks captured
//! live entities. Here deferred work is a plain queue of (countdown, kind)
//! pairs drained by the tick driver; tasks that refer to an entity carry its
//! id and the handler checks liveness before acting. Nothing fires while the
//! session is paused because the queue only advances inside an unpaused tick.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::ms_to_ticks;
use crate::tuning::Span;

/// What to do when a task's countdown reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Zombie generator cycle
    SpawnZombie,
    /// Special (ghost/witch/bat) generator cycle
    SpawnSpecial,
    /// Clear the session-start bat spawn lock
    UnlockBat,
    /// Send a waiting bat flying, if it is still alive
    WakeBat { entity_id: u32 },
    /// End the post-throw refractory lock
    ClearFireLock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Task {
    ticks_left: u32,
    kind: TaskKind,
    /// Repeating tasks re-roll a fresh interval from this range on firing
    rearm_ms: Option<Span>,
}

/// Pending deferred work, advanced once per unpaused tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    /// Queue a one-shot task
    pub fn schedule_once(&mut self, delay_ticks: u32, kind: TaskKind) {
        self.tasks.push(Task {
            ticks_left: delay_ticks.max(1),
            kind,
            rearm_ms: None,
        });
    }

    /// Queue a repeating task; the interval is re-rolled uniformly from
    /// `interval_ms` before every firing, including the first
    pub fn schedule_repeating(&mut self, interval_ms: Span, kind: TaskKind, rng: &mut Pcg32) {
        self.tasks.push(Task {
            ticks_left: roll_interval(interval_ms, rng),
            kind,
            rearm_ms: Some(interval_ms),
        });
    }

    /// Advance every countdown by one tick and return the tasks that fired,
    /// in scheduling order. One-shots are removed; repeating tasks rearm.
    pub fn advance(&mut self, rng: &mut Pcg32) -> Vec<TaskKind> {
        let mut fired = Vec::new();
        self.tasks.retain_mut(|task| {
            task.ticks_left -= 1;
            if task.ticks_left > 0 {
                return true;
            }
            fired.push(task.kind);
            match task.rearm_ms {
                Some(span) => {
                    task.ticks_left = roll_interval(span, rng);
                    true
                }
                None => false,
            }
        });
        fired
    }

    /// Discard every pending task, partially elapsed or not (game over and
    /// restart both do this en masse)
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Number of pending tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Whether a task of this kind is pending
    pub fn has_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }
}

fn roll_interval(span: Span, rng: &mut Pcg32) -> u32 {
    ms_to_ticks(rng.random_range(span.min..=span.max))
}
