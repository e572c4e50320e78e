//! Терминальный чат: читает строки из stdin и печатает ленту в stdout.

use crate::core::agent::{LumiAgent, ResolvedReply};
use crate::ui::message::ChatMessage;
use anyhow::{Context, Result};
use rand::Rng;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Введенная строка: команда со слешем, фраза выхода или сообщение
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Clear,
    History,
    Export,
    Blank,
    Message(&'a str),
}

impl<'a> Command<'a> {
    /// `exit_phrases` ищутся как подстроки в нижнем регистре
    pub fn parse(line: &'a str, exit_phrases: &[String]) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Command::Blank,
            "/quit" | "/exit" => Command::Quit,
            "/clear" => Command::Clear,
            "/history" => Command::History,
            "/export" => Command::Export,
            _ if is_exit_phrase(trimmed, exit_phrases) => Command::Quit,
            _ => Command::Message(line),
        }
    }
}

pub fn is_exit_phrase(text: &str, exit_phrases: &[String]) -> bool {
    let lower = text.to_lowercase();
    exit_phrases
        .iter()
        .any(|phrase| !phrase.is_empty() && lower.contains(phrase.as_str()))
}

/// `[3:07 PM] (L) Lumi: text`
pub fn render(message: &ChatMessage) -> String {
    format!(
        "[{}] ({}) {}: {}",
        message.time_label(),
        message.avatar(),
        message.sender,
        message.text
    )
}

/// Чат на stdin/stdout; Ctrl-C завершает сессию прощанием
pub async fn run<R>(
    agent: LumiAgent<R>,
    replies: mpsc::UnboundedReceiver<ResolvedReply>,
) -> Result<()>
where
    R: Rng + Send + 'static,
{
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("⚠️ Не удалось подписаться на Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_with(input, &mut output, interrupt, agent, replies).await
}

pub async fn run_with<I, W, S, R>(
    input: I,
    output: &mut W,
    shutdown: S,
    mut agent: LumiAgent<R>,
    mut replies: mpsc::UnboundedReceiver<ResolvedReply>,
) -> Result<()>
where
    I: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
    R: Rng + Send + 'static,
{
    emit(output, &render(agent.greet())).await?;
    emit(
        output,
        "(/quit to leave, /clear to reset, /history to replay, /export for JSON)",
    )
    .await?;

    let exit_phrases = agent.config().exit_phrases.clone();
    let mut lines = input.lines();
    let mut input_open = true;
    tokio::pin!(shutdown);

    loop {
        // После EOF дожидаемся оставшихся ответов
        if !input_open && agent.pending_replies() == 0 {
            break;
        }

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                log::info!("Получен сигнал прерывания");
                break;
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context("failed to read input")? else {
                    log::info!("Ввод закрыт, ожидаем {} ответ(ов)", agent.pending_replies());
                    input_open = false;
                    continue;
                };

                match Command::parse(&line, &exit_phrases) {
                    Command::Quit => break,
                    Command::Blank => {
                        let nudge = ChatMessage::assistant(
                            &agent.config().assistant_name,
                            &agent.config().blank_nudge,
                        );
                        emit(output, &render(&nudge)).await?;
                    }
                    Command::Clear => {
                        agent.clear_history();
                        emit(output, "(history cleared)").await?;
                    }
                    Command::History => {
                        let rendered: Vec<String> = agent.transcript().map(render).collect();
                        for line in rendered {
                            emit(output, &line).await?;
                        }
                    }
                    Command::Export => {
                        let messages: Vec<&ChatMessage> = agent.transcript().collect();
                        let json = serde_json::to_string_pretty(&messages)
                            .context("failed to serialize transcript")?;
                        emit(output, &json).await?;
                    }
                    Command::Message(text) => {
                        if agent.submit(text).is_some() {
                            if let Some(placeholder) = agent.transcript().last().map(render) {
                                emit(output, &placeholder).await?;
                            }
                        }
                    }
                }
            }
            Some(reply) = replies.recv() => {
                if let Some(message) = agent.resolve(reply).map(render) {
                    emit(output, &message).await?;
                }
            }
            else => break,
        }
    }

    emit(output, &render(agent.farewell())).await?;
    log::info!("👋 Сессия завершена");
    Ok(())
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output
        .write_all(format!("{line}\n").as_bytes())
        .await
        .context("failed to write output")?;
    output.flush().await.context("failed to flush output")
}
