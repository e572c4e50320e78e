//! Lumi: чат-ассистент, отвечающий по ключевым словам из библиотеки
//! готовых ответов, с имитацией "раздумий" перед каждым ответом.

// Модули приложения
pub mod ai;
pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod ui;

pub use ai::{ResponseSelector, RuleLibrary};
pub use config::Config;
pub use error::{LumiError, Result};
