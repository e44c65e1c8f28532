//! Delayed Work
//!
//! A queue of tasks that become due at a deadline. The queue never sleeps or spawns anything;
//! a driver asks for [`DelayQueue::next_deadline`], waits however its runtime waits, and then
//! calls [`DelayQueue::pop_due`].

use std::{cmp::Reverse, collections::BinaryHeap, time::Instant};

use rustc_hash::FxHashMap;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Deadline-ordered queue of pending tasks.
///
/// Tasks sharing a deadline become due in the order they were scheduled. Cancelled tasks are
/// dropped immediately and their heap entries skipped lazily.
#[derive(Debug)]
pub struct DelayQueue<T> {
    deadlines: BinaryHeap<Reverse<(Instant, TaskId)>>,
    tasks: FxHashMap<TaskId, T>,
    next_id: u64,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            deadlines: BinaryHeap::new(),
            tasks: FxHashMap::default(),
            next_id: 0,
        }
    }
}

impl<T> DelayQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.deadlines.push(Reverse((deadline, id)));
        self.tasks.insert(id, task);

        id
    }

    /// Cancel a pending task, returning it if it had not yet become due.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        self.tasks.remove(&id)
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.discard_cancelled();

        self.deadlines.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Remove and return every task whose deadline is at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<(TaskId, T)> {
        let mut due = Vec::new();

        while let Some(Reverse((deadline, id))) = self.deadlines.peek().copied() {
            if deadline > now {
                break;
            }

            self.deadlines.pop();

            if let Some(task) = self.tasks.remove(&id) {
                due.push((id, task));
            }
        }

        due
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.deadlines.peek() {
            if self.tasks.contains_key(id) {
                break;
            }

            self.deadlines.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn pop_due_returns_tasks_in_deadline_order() {
        let start = Instant::now();
        let mut queue = DelayQueue::new();

        queue.schedule(start + Duration::from_millis(30), "c");
        queue.schedule(start + Duration::from_millis(10), "a");
        queue.schedule(start + Duration::from_millis(20), "b");

        let due: Vec<&str> = queue
            .pop_due(start + Duration::from_millis(25))
            .into_iter()
            .map(|(_, task)| task)
            .collect();

        assert_eq!(due, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(start + Duration::from_millis(30)));
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let deadline = Instant::now();
        let mut queue = DelayQueue::new();

        queue.schedule(deadline, 1);
        queue.schedule(deadline, 2);
        queue.schedule(deadline, 3);

        let due: Vec<i32> = queue
            .pop_due(deadline)
            .into_iter()
            .map(|(_, task)| task)
            .collect();

        assert_eq!(due, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn nothing_is_due_before_deadline() {
        let start = Instant::now();
        let mut queue = DelayQueue::new();

        queue.schedule(start + Duration::from_secs(1), ());

        assert!(queue.pop_due(start).is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn cancelled_tasks_never_become_due() {
        let start = Instant::now();
        let mut queue = DelayQueue::new();

        let first = queue.schedule(start, "first");
        queue.schedule(start + Duration::from_millis(5), "second");

        assert_eq!(queue.cancel(first), Some("first"));
        assert_eq!(queue.cancel(first), None);
        assert_eq!(queue.next_deadline(), Some(start + Duration::from_millis(5)));

        let due: Vec<&str> = queue
            .pop_due(start + Duration::from_secs(1))
            .into_iter()
            .map(|(_, task)| task)
            .collect();

        assert_eq!(due, vec!["second"]);
        assert_eq!(queue.next_deadline(), None);
    }
}
