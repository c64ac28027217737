//! Task scheduling seam.

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Schedules callbacks for a later turn of the host's task queue.
pub trait Scheduler {
    /// Queues `task` to run after the current turn completes.
    fn schedule_task(&self, task: Task);
}

/// A manually driven FIFO task queue.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

impl TaskQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs one turn: every task queued before the call, in order.
    ///
    /// Tasks scheduled while the turn runs wait for the next turn. Returns the
    /// number of tasks run.
    pub fn run_pending(&self) -> usize {
        let turn = std::mem::take(&mut *self.tasks.borrow_mut());
        let count = turn.len();
        for task in turn {
            task();
        }
        count
    }
}

impl Scheduler for TaskQueue {
    fn schedule_task(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_scheduled_during_a_turn_wait() {
        let queue = TaskQueue::new();
        let ran = Rc::new(Cell::new(0));

        let (q, r) = (queue.clone(), ran.clone());
        queue.schedule_task(Box::new(move || {
            r.set(r.get() + 1);
            let r = r.clone();
            q.schedule_task(Box::new(move || r.set(r.get() + 10)));
        }));

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(ran.get(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(ran.get(), 11);
    }
}
