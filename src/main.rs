use anyhow::{Context, Result};
use lumi::core::{ConversationSimulator, LumiAgent, TokioScheduler};
use lumi::{logger, ui, Config, ResponseSelector, RuleLibrary};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Инициализируем логирование
    logger::init()?;
    log::info!("🚀 Lumi запущена");

    let config = Config::from_env();
    log::info!("📁 Конфигурация загружена");

    // Библиотека правил читается один раз при старте
    let library = match &config.rules_path {
        Some(path) => RuleLibrary::load(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => RuleLibrary::builtin().clone(),
    };

    let rng = match config.seed {
        Some(seed) => {
            log::info!("🎲 Фиксированный seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let simulator = ConversationSimulator::new(
        ResponseSelector::new(Arc::new(library)),
        Arc::new(TokioScheduler::current()?),
        rng,
        config.thinking_delay(),
    );

    let (agent, replies) = LumiAgent::new(config, simulator);
    ui::terminal::run(agent, replies).await
}
