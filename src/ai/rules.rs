use crate::error::{LumiError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;

/// Правило: набор ключевых слов -> набор готовых ответов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    keywords: Vec<String>,
    responses: Vec<String>,
}

impl Rule {
    /// Создает правило. Ключевые слова приводятся к нижнему регистру.
    pub fn new<K, R>(keywords: K, responses: R) -> Result<Self>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(Into::into)
            .map(|k: String| normalize(&k))
            .collect();
        let responses: Vec<String> = responses.into_iter().map(Into::into).collect();

        if keywords.is_empty() {
            return Err(LumiError::EmptyKeywords);
        }
        // Пустая строка - подстрока любого ввода
        if keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(LumiError::BlankKeyword);
        }
        if responses.is_empty() {
            return Err(LumiError::EmptyResponses);
        }
        if responses.iter().any(|r| r.trim().is_empty()) {
            return Err(LumiError::BlankResponse);
        }

        Ok(Self { keywords, responses })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// `normalized` должен быть уже приведен через [`normalize`]
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k.as_str()))
    }
}

/// Ответы на случай, когда ни одно правило не подошло
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSet(Vec<String>);

impl FallbackSet {
    pub fn new<I>(replies: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            return Err(LumiError::EmptyFallbacks);
        }
        if replies.iter().any(|r| r.trim().is_empty()) {
            return Err(LumiError::BlankFallback);
        }
        Ok(Self(replies))
    }

    pub fn replies(&self) -> &[String] {
        &self.0
    }
}

/// Упорядоченный список правил: приоритет = порядок, первое совпадение побеждает
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLibrary {
    rules: Vec<Rule>,
    fallbacks: FallbackSet,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RuleEntry>,
    fallbacks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    keywords: Vec<String>,
    responses: Vec<String>,
}

impl RuleLibrary {
    pub fn new(rules: Vec<Rule>, fallbacks: FallbackSet) -> Self {
        Self { rules, fallbacks }
    }

    /// Встроенная библиотека Lumi
    pub fn builtin() -> &'static RuleLibrary {
        &BUILTIN
    }

    /// Разбирает библиотеку из JSON вида
    /// `{"rules": [{"keywords": [..], "responses": [..]}], "fallbacks": [..]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(json)?;

        let rules = file
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Rule::new(entry.keywords, entry.responses).map_err(|e| LumiError::InvalidRule {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(rules, FallbackSet::new(file.fallbacks)?))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| LumiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let library = Self::from_json(&json)?;
        log::info!(
            "📚 Библиотека правил загружена: {} ({} правил)",
            path.display(),
            library.rules.len()
        );
        Ok(library)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallbacks(&self) -> &FallbackSet {
        &self.fallbacks
    }

    /// Первое правило, чьё ключевое слово входит в ввод
    pub fn find_match(&self, input: &str) -> Option<&Rule> {
        let normalized = normalize(input);
        self.rules.iter().find(|rule| rule.matches(&normalized))
    }
}

/// Нормализация ввода: только приведение регистра
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

static BUILTIN: Lazy<RuleLibrary> = Lazy::new(|| {
    let rules = BUILTIN_RULES
        .iter()
        .map(|(keywords, responses)| Rule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
        })
        .collect();
    let fallbacks = FallbackSet(BUILTIN_FALLBACKS.iter().map(|r| r.to_string()).collect());
    RuleLibrary::new(rules, fallbacks)
});

type StaticRule = (&'static [&'static str], &'static [&'static str]);

const BUILTIN_RULES: &[StaticRule] = &[
    (
        &["hello", "hi", "hey", "greetings"],
        &[
            "Hey there! It's great to meet you. How can I help today?",
            "Hello! I'm here and ready to dive into anything you're curious about.",
            "Hi! What would you like to chat about first?",
        ],
    ),
    (
        &["help", "support", "assist"],
        &[
            "I can brainstorm ideas, offer productivity tips, or simply keep you company while you work.",
            "Need a second brain? I can help plan tasks, explain tricky topics, or come up with creative prompts.",
            "I'm a flexible assistant—ask about focus routines, healthy breaks, or even fun trivia!",
        ],
    ),
    (
        &["productivity", "focus", "motivation"],
        &[
            "Try a 25-minute focus sprint followed by a 5-minute stretch. It keeps your mind energized!",
            "Setting a tiny, achievable goal for the next 10 minutes is a wonderful motivation kickstarter.",
            "Pair tasks with music that matches your pace—lo-fi for deep focus, upbeat tunes for energy.",
        ],
    ),
    (
        &["break", "bored", "relax"],
        &[
            "How about a quick window stretch? Let your eyes rest on something 20 feet away for 20 seconds.",
            "Grab a glass of water and take five mindful breaths—tiny reset, big difference!",
            "Maybe doodle your favorite animal for 2 minutes; playful creativity can reset your brain.",
        ],
    ),
    (
        &["thank", "thanks", "appreciate"],
        &[
            "Anytime! Helping you out is my favorite thing.",
            "You're welcome! Let me know if there's anything else you'd like to explore.",
            "Happy to be here for you—just say the word if you need more support.",
        ],
    ),
];

const BUILTIN_FALLBACKS: &[&str] = &[
    "That's interesting! Tell me more so I can come up with a helpful suggestion.",
    "I might not have the perfect answer yet, but I'm eager to figure it out with you.",
    "Let's explore that together—what part should we tackle first?",
];
