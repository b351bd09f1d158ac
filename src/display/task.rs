//! Display tasks and their keyed state storage.
//!
//! Each task carries a small heterogeneous map from string keys to typed
//! values. Writers replace whole values under a write lock, so a reader on
//! another thread sees either the old or the new value, never a mix.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::error::{PanelError, PanelResult};

type Slot = Arc<dyn Any + Send + Sync>;

/// Typed key/value slots attached to one task.
#[derive(Default)]
pub struct TaskState {
    slots: RwLock<HashMap<String, Slot>>,
}

impl TaskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot. An absent key reads as `T::default()`.
    pub fn get<T>(&self, key: &str) -> PanelResult<T>
    where
        T: Clone + Default + Send + Sync + 'static,
    {
        let slots = self.slots.read();
        match slots.get(key) {
            None => Ok(T::default()),
            Some(slot) => slot
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| PanelError::StateTypeMismatch {
                    key: key.to_string(),
                    expected: type_name::<T>(),
                }),
        }
    }

    /// Replace a slot wholesale.
    pub fn set<T>(&self, key: &str, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.slots.write().insert(key.to_string(), Arc::new(value));
    }

    /// Read-modify-write a slot under one write lock. Returns the new value.
    pub fn update<T, F>(&self, key: &str, f: F) -> PanelResult<T>
    where
        T: Clone + Default + Send + Sync + 'static,
        F: FnOnce(T) -> T,
    {
        let mut slots = self.slots.write();
        let current = match slots.get(key) {
            None => T::default(),
            Some(slot) => slot.downcast_ref::<T>().cloned().ok_or_else(|| {
                PanelError::StateTypeMismatch {
                    key: key.to_string(),
                    expected: type_name::<T>(),
                }
            })?,
        };
        let next = f(current);
        slots.insert(key.to_string(), Arc::new(next.clone()));
        Ok(next)
    }
}

/// One entry in the display's task list.
pub struct PanelTask {
    id: usize,
    description: String,
    started: Instant,
    state: TaskState,
}

impl PanelTask {
    pub(crate) fn new(id: usize, description: String) -> Self {
        Self {
            id,
            description,
            started: Instant::now(),
            state: TaskState::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Time since the task was added.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }
}

impl std::fmt::Debug for PanelTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelTask")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_default() {
        let state = TaskState::new();
        let value: u32 = state.get("missing").unwrap();
        assert_eq!(value, 0);
    }

    #[test]
    fn set_replaces_value() {
        let state = TaskState::new();
        state.set("k", String::from("first"));
        state.set("k", String::from("second"));
        assert_eq!(state.get::<String>("k").unwrap(), "second");
    }

    #[test]
    fn wrong_type_is_mismatch() {
        let state = TaskState::new();
        state.set("k", 5u64);
        let err = state.get::<String>("k").unwrap_err();
        match err {
            PanelError::StateTypeMismatch { key, expected } => {
                assert_eq!(key, "k");
                assert!(expected.contains("String"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn update_starts_from_default() {
        let state = TaskState::new();
        assert_eq!(state.update("n", |n: i32| n + 2).unwrap(), 2);
        assert_eq!(state.update("n", |n: i32| n * 10).unwrap(), 20);
        assert_eq!(state.get::<i32>("n").unwrap(), 20);
    }

    #[test]
    fn concurrent_writes_are_never_torn() {
        #[derive(Clone, Default)]
        struct Pair(u64, u64);

        let task = Arc::new(PanelTask::new(0, "pair".into()));
        let writer = {
            let task = Arc::clone(&task);
            std::thread::spawn(move || {
                for i in 0..5_000u64 {
                    task.state().set("pair", Pair(i, i));
                }
            })
        };
        for _ in 0..5_000 {
            let Pair(a, b) = task.state().get::<Pair>("pair").unwrap();
            assert_eq!(a, b);
        }
        writer.join().unwrap();
    }

    #[test]
    fn task_metadata() {
        let task = PanelTask::new(3, "label".into());
        assert_eq!(task.id(), 3);
        assert_eq!(task.description(), "label");
        assert!(format!("{task:?}").contains("label"));
    }
}
