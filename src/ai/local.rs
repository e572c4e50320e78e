use crate::ai::rules::{Rule, RuleLibrary};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

/// Локальный AI с правилами для базовых ответов
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    library: Arc<RuleLibrary>,
}

impl ResponseSelector {
    pub fn new(library: Arc<RuleLibrary>) -> Self {
        Self { library }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(RuleLibrary::builtin().clone()))
    }

    pub fn library(&self) -> &RuleLibrary {
        &self.library
    }

    pub fn matching_rule(&self, user_input: &str) -> Option<&Rule> {
        self.library.find_match(user_input)
    }

    /// Подбирает ответ: первое совпавшее правило, иначе - общий ответ.
    /// Всегда возвращает непустую строку.
    pub fn select_response<R: Rng + ?Sized>(&self, user_input: &str, rng: &mut R) -> &str {
        let pool = match self.matching_rule(user_input) {
            Some(rule) => {
                log::debug!("🎯 Совпало правило [{}]", rule.keywords().join(", "));
                rule.responses()
            }
            None => {
                log::debug!("🤷 Совпадений нет, общий ответ");
                self.library.fallbacks().replies()
            }
        };

        // Библиотека не допускает пустых наборов
        pool.choose(rng).map(String::as_str).unwrap_or_default()
    }
}
