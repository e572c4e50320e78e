use crate::config::Config;
use crate::core::simulator::ConversationSimulator;
use crate::ui::message::ChatMessage;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashSet, VecDeque};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Готовый ответ для заглушки с идентификатором `placeholder_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReply {
    pub placeholder_id: Uuid,
    pub text: String,
}

/// Модель разговора для UI: лента сообщений + отложенные ответы.
/// Ответы приходят в канал, который отдает [`LumiAgent::new`].
pub struct LumiAgent<R = StdRng> {
    config: Config,
    simulator: ConversationSimulator<R>,
    transcript: VecDeque<ChatMessage>,
    /// Ответы, которые еще не пришли; не зависит от состояния ленты
    in_flight: HashSet<Uuid>,
    reply_sender: mpsc::UnboundedSender<ResolvedReply>,
}

impl<R> LumiAgent<R>
where
    R: Rng + Send + 'static,
{
    pub fn new(
        config: Config,
        simulator: ConversationSimulator<R>,
    ) -> (Self, mpsc::UnboundedReceiver<ResolvedReply>) {
        let (reply_sender, reply_receiver) = mpsc::unbounded_channel();
        let agent = Self {
            config,
            simulator,
            transcript: VecDeque::new(),
            in_flight: HashSet::new(),
            reply_sender,
        };
        (agent, reply_receiver)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Приветствие ассистента в начале разговора
    pub fn greet(&mut self) -> &ChatMessage {
        let greeting = ChatMessage::assistant(&self.config.assistant_name, &self.config.greeting);
        self.push(greeting)
    }

    /// Прощальная реплика ассистента
    pub fn farewell(&mut self) -> &ChatMessage {
        let text = self
            .simulator
            .pick(&self.config.farewells)
            .unwrap_or("Goodbye!")
            .to_string();
        let farewell = ChatMessage::assistant(&self.config.assistant_name, text);
        self.push(farewell)
    }

    /// Принимает сообщение пользователя. Пустой ввод игнорируется.
    /// Возвращает id заглушки, которую заменит ответ.
    pub fn submit(&mut self, raw: &str) -> Option<Uuid> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.push(ChatMessage::user(&self.config.user_name, text));
        let placeholder_id = self
            .push(ChatMessage::placeholder(
                &self.config.assistant_name,
                &self.config.thinking_text,
            ))
            .id;
        self.in_flight.insert(placeholder_id);

        let sender = self.reply_sender.clone();
        self.simulator.simulate_reply(text, move |reply| {
            let resolved = ResolvedReply {
                placeholder_id,
                text: reply,
            };
            // UI мог уже закрыться
            if sender.send(resolved).is_err() {
                log::debug!("Канал ответов закрыт, ответ {} отброшен", placeholder_id);
            }
        });

        log::info!("💬 Принято сообщение ({} симв.)", text.chars().count());
        Some(placeholder_id)
    }

    /// Подставляет ответ вместо заглушки. Пустой ответ в ленту не попадает,
    /// но ожидание по нему снимается.
    pub fn resolve(&mut self, reply: ResolvedReply) -> Option<&ChatMessage> {
        self.in_flight.remove(&reply.placeholder_id);
        if reply.text.is_empty() {
            return None;
        }

        match self
            .transcript
            .iter()
            .position(|m| m.id == reply.placeholder_id)
        {
            Some(index) => {
                let message = &mut self.transcript[index];
                message.text = reply.text;
                message.pending = false;
                Some(&self.transcript[index])
            }
            None => {
                // Заглушка вытеснена из ленты или лента очищена
                log::debug!("Заглушка {} не найдена, ответ добавлен в конец", reply.placeholder_id);
                let message = ChatMessage::assistant(&self.config.assistant_name, reply.text);
                Some(self.push(message))
            }
        }
    }

    pub fn transcript(&self) -> impl Iterator<Item = &ChatMessage> {
        self.transcript.iter()
    }

    /// Сколько ответов еще в пути, даже если их заглушки уже вытеснены
    pub fn pending_replies(&self) -> usize {
        self.in_flight.len()
    }

    pub fn clear_history(&mut self) {
        self.transcript.clear();
        log::info!("🗑️  История разговора очищена");
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.transcript.push_back(message);
        while self.transcript.len() > self.config.history_limit {
            self.transcript.pop_front();
        }
        // Лимит истории всегда > 0
        &self.transcript[self.transcript.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ResponseSelector;
    use crate::core::scheduler::ManualScheduler;
    use crate::core::simulator::ThinkingDelay;
    use rand::SeedableRng;
    use std::sync::Arc;
    use std::time::Duration;

    fn agent(
        config: Config,
    ) -> (
        LumiAgent,
        mpsc::UnboundedReceiver<ResolvedReply>,
        Arc<ManualScheduler>,
    ) {
        let scheduler = Arc::new(ManualScheduler::new());
        let simulator = ConversationSimulator::new(
            ResponseSelector::builtin(),
            scheduler.clone(),
            StdRng::seed_from_u64(1),
            ThinkingDelay::default(),
        );
        let (agent, rx) = LumiAgent::new(config, simulator);
        (agent, rx, scheduler)
    }

    #[test]
    fn greeting_opens_the_conversation() {
        let (mut agent, _rx, _) = agent(Config::default());
        let greeting = agent.greet().clone();
        assert_eq!(greeting.sender, "Lumi");
        assert!(!greeting.is_user && !greeting.pending);
        assert_eq!(agent.transcript().count(), 1);
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let (mut agent, mut rx, scheduler) = agent(Config::default());
        assert_eq!(agent.submit(""), None);
        assert_eq!(agent.submit("   \n\t"), None);
        assert_eq!(agent.transcript().count(), 0);
        assert_eq!(scheduler.pending(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submission_adds_user_message_and_placeholder() {
        let (mut agent, _rx, scheduler) = agent(Config::default());
        let id = agent.submit("  hello Lumi  ").unwrap();

        let messages: Vec<_> = agent.transcript().cloned().collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].text, "hello Lumi");
        assert_eq!(messages[0].sender, "You");
        assert_eq!(messages[1].id, id);
        assert!(messages[1].pending);
        assert_eq!(messages[1].text, "…thinking");
        assert_eq!(agent.pending_replies(), 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn resolved_reply_replaces_placeholder() {
        let (mut agent, mut rx, scheduler) = agent(Config::default());
        let id = agent.submit("thanks!").unwrap();

        assert!(rx.try_recv().is_err());
        scheduler.advance(Duration::from_millis(1200));

        let reply = rx.try_recv().unwrap();
        assert_eq!(reply.placeholder_id, id);

        let resolved = agent.resolve(reply).unwrap().clone();
        assert_eq!(resolved.id, id);
        assert!(!resolved.pending);
        assert!(ResponseSelector::builtin()
            .matching_rule("thanks")
            .unwrap()
            .responses()
            .contains(&resolved.text));
        assert_eq!(agent.transcript().count(), 2);
        assert_eq!(agent.pending_replies(), 0);
    }

    #[test]
    fn empty_reply_is_ignored() {
        let (mut agent, _rx, _) = agent(Config::default());
        let id = agent.submit("hey").unwrap();
        let reply = ResolvedReply {
            placeholder_id: id,
            text: String::new(),
        };
        assert!(agent.resolve(reply).is_none());
        assert_eq!(agent.pending_replies(), 0);
        assert!(agent.transcript().last().unwrap().pending);
    }

    #[test]
    fn reply_after_clear_is_appended() {
        let (mut agent, mut rx, scheduler) = agent(Config::default());
        agent.submit("I need a break").unwrap();
        agent.clear_history();
        assert_eq!(agent.pending_replies(), scheduler.pending());
        assert_eq!(agent.pending_replies(), 1);

        scheduler.advance(Duration::from_millis(1200));
        let reply = rx.try_recv().unwrap();
        let appended = agent.resolve(reply).unwrap().clone();

        assert_eq!(appended.sender, "Lumi");
        assert!(!appended.pending);
        assert_eq!(agent.transcript().count(), 1);
        assert_eq!(agent.pending_replies(), 0);
    }

    #[test]
    fn evicted_placeholders_still_count_as_pending() {
        let config = Config {
            history_limit: 1,
            ..Config::default()
        };
        let (mut agent, mut rx, scheduler) = agent(config);
        agent.submit("hello").unwrap();
        agent.submit("focus").unwrap();
        assert_eq!(agent.transcript().filter(|m| m.pending).count(), 1);
        assert_eq!(agent.pending_replies(), 2);

        scheduler.advance(Duration::from_millis(1200));
        while let Ok(reply) = rx.try_recv() {
            agent.resolve(reply);
        }
        assert_eq!(agent.pending_replies(), 0);
    }

    #[test]
    fn farewell_comes_from_configured_lines() {
        let (mut agent, _rx, _) = agent(Config::default());
        let farewell = agent.farewell().clone();
        assert!(!farewell.is_user);
        assert!(Config::default().farewells.contains(&farewell.text));
    }

    #[test]
    fn transcript_is_capped() {
        let config = Config {
            history_limit: 3,
            ..Config::default()
        };
        let (mut agent, _rx, _) = agent(config);
        agent.greet();
        agent.submit("one");
        agent.submit("two");

        let texts: Vec<_> = agent.transcript().map(|m| m.text.clone()).collect();
        assert_eq!(texts, ["…thinking", "two", "…thinking"]);
    }
}
