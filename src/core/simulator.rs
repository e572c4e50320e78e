use crate::ai::ResponseSelector;
use crate::core::scheduler::{Scheduler, TaskHandle};
use crate::error::{LumiError, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub const DEFAULT_THINKING_MIN_MS: u64 = 400;
pub const DEFAULT_THINKING_MAX_MS: u64 = 1200;

/// Окно задержки "раздумий": [min, max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkingDelay {
    min_ms: u64,
    max_ms: u64,
}

impl ThinkingDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        if min_ms >= max_ms {
            return Err(LumiError::InvalidDelay { min_ms, max_ms });
        }
        Ok(Self { min_ms, max_ms })
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..self.max_ms))
    }
}

impl Default for ThinkingDelay {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_THINKING_MIN_MS,
            max_ms: DEFAULT_THINKING_MAX_MS,
        }
    }
}

/// Имитация асинхронного ответа: через случайную задержку подбирает
/// ответ и передает его в колбэк.
pub struct ConversationSimulator<R = StdRng> {
    selector: ResponseSelector,
    scheduler: Arc<dyn Scheduler>,
    rng: Arc<Mutex<R>>,
    delay: ThinkingDelay,
}

impl<R> Clone for ConversationSimulator<R> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            scheduler: Arc::clone(&self.scheduler),
            rng: Arc::clone(&self.rng),
            delay: self.delay,
        }
    }
}

impl<R> ConversationSimulator<R>
where
    R: Rng + Send + 'static,
{
    pub fn new(
        selector: ResponseSelector,
        scheduler: Arc<dyn Scheduler>,
        rng: R,
        delay: ThinkingDelay,
    ) -> Self {
        Self {
            selector,
            scheduler,
            rng: Arc::new(Mutex::new(rng)),
            delay,
        }
    }

    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    pub fn delay(&self) -> ThinkingDelay {
        self.delay
    }

    /// Случайный элемент набора с тем же генератором, что и ответы
    pub fn pick<'a>(&self, pool: &'a [String]) -> Option<&'a str> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        pool.choose(&mut *rng).map(String::as_str)
    }

    /// Планирует `on_resolved(ответ)` через задержку из окна.
    /// Ответ подбирается в момент срабатывания, а не постановки.
    pub fn simulate_reply<F>(&self, user_input: impl Into<String>, on_resolved: F) -> TaskHandle
    where
        F: FnOnce(String) + Send + 'static,
    {
        let user_input = user_input.into();
        let delay = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.delay.sample(&mut *rng)
        };

        let selector = self.selector.clone();
        let rng = Arc::clone(&self.rng);

        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                let reply = {
                    let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                    selector.select_response(&user_input, &mut *rng).to_string()
                };
                on_resolved(reply);
            }),
        );

        log::debug!("⏳ Ответ {} запланирован через {:?}", handle.id, delay);
        handle
    }
}
