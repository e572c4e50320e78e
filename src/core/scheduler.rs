use crate::error::{LumiError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Отложенная задача, поставленная в планировщик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    pub id: Uuid,
    pub delay: Duration,
}

impl TaskHandle {
    fn new(delay: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            delay,
        }
    }
}

/// Таймер + колбэк. Задача выполняется ровно один раз после `delay`.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Планировщик поверх tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }

    /// Привязывается к текущему runtime
    pub fn current() -> Result<Self> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|_| LumiError::NoRuntime)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new(delay);
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        handle
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
}

/// Планировщик с виртуальными часами: время двигается только через `advance`
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Сдвигает часы и выполняет все созревшие задачи по порядку (срок, постановка).
    /// Возвращает число выполненных задач.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut ran = 0;

        loop {
            // Задача выполняется без блокировки: она может ставить новые
            let next = {
                let mut state = self.lock();
                let due_index = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);

                match due_index {
                    Some(i) => {
                        let pending = state.pending.swap_remove(i);
                        state.now = state.now.max(pending.due);
                        pending.task
                    }
                    None => {
                        state.now = target;
                        break;
                    }
                }
            };

            next();
            ran += 1;
        }

        ran
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut state = self.lock();
        let due = state.now + delay;
        let seq = state.seq;
        state.seq += 1;
        state.pending.push(Pending { due, seq, task });
        TaskHandle::new(delay)
    }
}
