//! Update session state machine
//!
//! One session per process: `Idle -> Started -> (CommitRequested | Abandoned)`.

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Started,
    CommitRequested,
    Abandoned,
}

impl UpdatePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatePhase::Idle => "idle",
            UpdatePhase::Started => "started",
            UpdatePhase::CommitRequested => "commit_requested",
            UpdatePhase::Abandoned => "abandoned",
        }
    }
}

#[derive(Debug)]
pub struct UpdateSession {
    phase: Mutex<UpdatePhase>,
}

impl UpdateSession {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(UpdatePhase::Idle),
        }
    }

    pub fn phase(&self) -> UpdatePhase {
        *self.lock()
    }

    /// `Idle -> Started`. Returns false if the session already left `Idle`.
    pub fn begin(&self) -> bool {
        self.transition(UpdatePhase::Idle, UpdatePhase::Started)
    }

    /// `Started -> CommitRequested`
    pub fn request_commit(&self) -> bool {
        self.transition(UpdatePhase::Started, UpdatePhase::CommitRequested)
    }

    /// `Started -> Abandoned`
    pub fn abandon(&self) -> bool {
        self.transition(UpdatePhase::Started, UpdatePhase::Abandoned)
    }

    fn transition(&self, from: UpdatePhase, to: UpdatePhase) -> bool {
        let mut phase = self.lock();
        if *phase != from {
            return false;
        }
        *phase = to;
        true
    }

    fn lock(&self) -> MutexGuard<'_, UpdatePhase> {
        self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for UpdateSession {
    fn default() -> Self {
        Self::new()
    }
}
