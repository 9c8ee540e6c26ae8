//! Bounded undo history of whole-collection snapshots.

use std::collections::VecDeque;

use crate::model::Workspace;

/// Snapshots kept before the oldest is evicted.
pub const MAX_HISTORY_LENGTH: usize = 20;

/// Push-only stack of workspace collections. Undo pops; there is no redo.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: VecDeque<Vec<Workspace>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot, evicting the oldest one past capacity.
    pub fn push(&mut self, snapshot: Vec<Workspace>) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > MAX_HISTORY_LENGTH {
            self.snapshots.pop_front();
        }
    }

    /// Take the most recent snapshot.
    pub fn pop(&mut self) -> Option<Vec<Workspace>> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Vec<Workspace> {
        vec![Workspace::new(name, "a@x.com")]
    }

    #[test]
    fn test_pop_is_last_in_first_out() {
        let mut history = History::new();
        history.push(named("one"));
        history.push(named("two"));

        assert_eq!(history.pop().unwrap()[0].name, "two");
        assert_eq!(history.pop().unwrap()[0].name, "one");
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_oldest_is_evicted() {
        let mut history = History::new();
        for i in 0..25 {
            history.push(named(&i.to_string()));
        }

        assert_eq!(history.len(), MAX_HISTORY_LENGTH);
        let mut remaining = Vec::new();
        while let Some(snapshot) = history.pop() {
            remaining.push(snapshot[0].name.clone());
        }
        let expected: Vec<String> = (5..25).rev().map(|i| i.to_string()).collect();
        assert_eq!(remaining, expected);
    }
}
