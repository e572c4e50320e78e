//! Модуль для инициализации логирования
//! Логирует в файл logs/lumi.log: stdout занят чатом

use anyhow::{Context, Result};
use log::LevelFilter;
use std::io::Write;
use std::path::Path;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "lumi.log";

pub fn init() -> Result<()> {
    let mut builder = env_logger::Builder::new();

    // Читаем RUST_LOG переменную если она установлена
    if let Ok(log_level) = std::env::var("RUST_LOG") {
        builder.parse_filters(&log_level);
    } else {
        builder.filter_level(LevelFilter::Info);
    }

    // Формат логов: [HH:MM:SS LEVEL] модуль - сообщение
    builder.format(|buf, record| {
        let now = chrono::Local::now().format("%H:%M:%S");
        writeln!(
            buf,
            "[{} {}] {} - {}",
            now,
            record.level(),
            record.target(),
            record.args()
        )
    });

    std::fs::create_dir_all(LOG_DIR)
        .with_context(|| format!("failed to create log directory {LOG_DIR}"))?;

    let path = Path::new(LOG_DIR).join(LOG_FILE);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    builder
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialized")?;

    log::info!("Логирование инициализировано ✓");
    Ok(())
}
