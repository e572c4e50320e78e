use crate::core::simulator::{ThinkingDelay, DEFAULT_THINKING_MAX_MS, DEFAULT_THINKING_MIN_MS};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub assistant_name: String,
    pub user_name: String,
    pub greeting: String,
    pub thinking_text: String,
    pub thinking_min_ms: u64,
    pub thinking_max_ms: u64,
    pub seed: Option<u64>,
    pub rules_path: Option<PathBuf>,
    pub history_limit: usize,
    /// Ответ на пустую строку в терминале
    pub blank_nudge: String,
    pub farewells: Vec<String>,
    /// Фразы пользователя, завершающие сессию (поиск подстроки)
    pub exit_phrases: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let assistant_name = "Lumi".to_string();
        let greeting = format!(
            "Hello! I'm {}, your friendly AI assistant. \
            What would you like to explore together today?",
            assistant_name
        );

        Self {
            assistant_name,
            user_name: "You".to_string(),
            greeting,
            thinking_text: "…thinking".to_string(),
            thinking_min_ms: DEFAULT_THINKING_MIN_MS,
            thinking_max_ms: DEFAULT_THINKING_MAX_MS,
            seed: None,
            rules_path: None,
            history_limit: 50,
            blank_nudge: "Toss me something juicier than silence.".to_string(),
            farewells: vec![
                "Later nerd! Try not to set the universe on fire without me.".to_string(),
                "Peace out! Holler when you need more cosmic sass.".to_string(),
                "I'm ghosting this chat like it's my gym membership. Bye!".to_string(),
            ],
            exit_phrases: ["bye", "quit", "exit", "leave"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Значения по умолчанию, переопределенные переменными окружения (и .env)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("LUMI_ASSISTANT_NAME").filter(|v| !v.trim().is_empty()) {
            config.greeting = config.greeting.replace(&config.assistant_name, &name);
            config.assistant_name = name;
        }

        if let Some(name) = lookup("LUMI_USER_NAME").filter(|v| !v.trim().is_empty()) {
            config.user_name = name;
        }

        let parse_u64 = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(min) = parse_u64("LUMI_THINKING_MIN_MS") {
            config.thinking_min_ms = min;
        }
        if let Some(max) = parse_u64("LUMI_THINKING_MAX_MS") {
            config.thinking_max_ms = max;
        }

        config.seed = parse_u64("LUMI_SEED");

        config.history_limit = lookup("LUMI_HISTORY_LIMIT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(config.history_limit);

        // Явный путь, иначе ~/.config/lumi/rules.json если файл существует
        config.rules_path = lookup("LUMI_RULES_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                dirs::config_dir()
                    .map(|dir| dir.join("lumi/rules.json"))
                    .filter(|path| path.exists())
            });

        config
    }

    /// Окно задержки; некорректные значения заменяются значениями по умолчанию
    pub fn thinking_delay(&self) -> ThinkingDelay {
        ThinkingDelay::new(self.thinking_min_ms, self.thinking_max_ms).unwrap_or_else(|e| {
            log::warn!("⚠️ {}, используется окно по умолчанию", e);
            ThinkingDelay::default()
        })
    }
}
