//! Work queue and result channel for parallel search workers.

use crate::search::result::{SearchStatistics, Solution};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Worker found a solution in a branch.
    Solved {
        worker_id: usize,
        branch: usize,
        solution: Solution,
    },
    /// Worker searched a branch completely without success.
    Exhausted { worker_id: usize, branch: usize },
    /// Worker gave up on a branch (lower branch solved, or stop requested).
    Aborted { worker_id: usize, branch: usize },
    /// Worker has drained the queue.
    Finished {
        worker_id: usize,
        statistics: SearchStatistics,
    },
}

/// Shared state for first-solution semantics across all workers.
#[derive(Debug)]
pub struct SharedProgress {
    /// Lowest branch index that produced a solution (usize::MAX means none yet).
    pub best_branch: AtomicUsize,
    /// Flag to signal all workers to stop.
    pub should_stop: AtomicBool,
}

impl Default for SharedProgress {
    fn default() -> Self {
        Self {
            best_branch: AtomicUsize::new(usize::MAX),
            should_stop: AtomicBool::new(false),
        }
    }
}

impl SharedProgress {
    /// Record a solved branch. Returns true if it is now the lowest solved one.
    pub fn try_update(&self, branch: usize) -> bool {
        let mut current = self.best_branch.load(Ordering::SeqCst);
        loop {
            if branch >= current {
                return false;
            }
            match self.best_branch.compare_exchange_weak(
                current,
                branch,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(c) => current = c,
            }
        }
    }

    /// Lowest solved branch so far.
    pub fn best_branch(&self) -> Option<usize> {
        match self.best_branch.load(Ordering::SeqCst) {
            usize::MAX => None,
            branch => Some(branch),
        }
    }

    /// A branch is no longer worth searching once a lower one is solved.
    pub fn is_superseded(&self, branch: usize) -> bool {
        self.should_stop() || self.best_branch.load(Ordering::SeqCst) < branch
    }

    /// Check if we should stop searching.
    pub fn should_stop(&self) -> bool {
        self.should_stop.load(Ordering::SeqCst)
    }

    /// Signal all workers to stop.
    pub fn signal_stop(&self) {
        self.should_stop.store(true, Ordering::SeqCst);
    }
}

/// Channel endpoints for a worker.
pub struct WorkerChannels {
    /// Send messages to coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Branch indices still to be searched.
    pub branches: Receiver<usize>,
    /// Shared progress.
    pub shared: Arc<SharedProgress>,
}

/// Channel endpoints for the coordinator.
pub struct CoordinatorChannels {
    /// Receive messages from workers.
    pub from_workers: Receiver<WorkerMessage>,
    /// Shared progress.
    pub shared: Arc<SharedProgress>,
}

/// Create channels for `num_workers` workers with a queue pre-filled with
/// branches `0..num_branches` in order.
pub fn create_channels(
    num_workers: usize,
    num_branches: usize,
) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let shared = Arc::new(SharedProgress::default());

    let (worker_tx, coordinator_rx) = unbounded();

    // The queue sender is dropped on return, so workers see the end of the
    // queue once it is drained
    let (branch_tx, branch_rx) = unbounded();
    for branch in 0..num_branches {
        let _ = branch_tx.send(branch);
    }

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            branches: branch_rx.clone(),
            shared: Arc::clone(&shared),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        shared,
    };

    (coordinator, worker_channels)
}
