use lumi::core::{ConversationSimulator, LumiAgent, ManualScheduler, ThinkingDelay, TokioScheduler};
use lumi::{Config, ResponseSelector, RuleLibrary};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

fn responses_for(input: &str) -> Vec<String> {
    RuleLibrary::builtin()
        .find_match(input)
        .map(|rule| rule.responses().to_vec())
        .unwrap_or_else(|| RuleLibrary::builtin().fallbacks().replies().to_vec())
}

#[tokio::test(start_paused = true)]
async fn replies_arrive_within_thinking_window() {
    let simulator = ConversationSimulator::new(
        ResponseSelector::builtin(),
        Arc::new(TokioScheduler::current().unwrap()),
        StdRng::seed_from_u64(7),
        ThinkingDelay::default(),
    );
    let (mut agent, mut replies) = LumiAgent::new(Config::default(), simulator);
    agent.greet();

    let started = tokio::time::Instant::now();
    let id = agent.submit("I need help with productivity").unwrap();

    let reply = replies.recv().await.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1200), "{elapsed:?}");

    assert_eq!(reply.placeholder_id, id);
    let message = agent.resolve(reply).unwrap();
    assert!(responses_for("help").contains(&message.text));
    assert_eq!(agent.pending_replies(), 0);
}

#[tokio::test(start_paused = true)]
async fn overlapping_replies_all_resolve() {
    let simulator = ConversationSimulator::new(
        ResponseSelector::builtin(),
        Arc::new(TokioScheduler::current().unwrap()),
        StdRng::seed_from_u64(99),
        ThinkingDelay::default(),
    );
    let (mut agent, mut replies) = LumiAgent::new(Config::default(), simulator);

    let inputs = ["hey", "so bored", "what is a monad?"];
    let ids: Vec<_> = inputs.iter().map(|i| agent.submit(i).unwrap()).collect();
    assert_eq!(agent.pending_replies(), 3);

    for _ in 0..inputs.len() {
        let reply = replies.recv().await.unwrap();
        let index = ids.iter().position(|id| *id == reply.placeholder_id).unwrap();
        let message = agent.resolve(reply).unwrap();
        assert!(responses_for(inputs[index]).contains(&message.text));
    }
    assert_eq!(agent.pending_replies(), 0);
}

#[test]
fn conversation_with_manual_clock() {
    let scheduler = Arc::new(ManualScheduler::new());
    let simulator = ConversationSimulator::new(
        ResponseSelector::builtin(),
        scheduler.clone(),
        StdRng::seed_from_u64(3),
        ThinkingDelay::new(100, 200).unwrap(),
    );
    let (mut agent, mut replies) = LumiAgent::new(Config::default(), simulator);

    agent.submit("hi, thanks for the help").unwrap();
    assert_eq!(scheduler.advance(Duration::from_millis(99)), 0);
    assert!(replies.try_recv().is_err());

    assert_eq!(scheduler.advance(Duration::from_millis(101)), 1);
    let reply = replies.try_recv().unwrap();
    let message = agent.resolve(reply).unwrap();
    assert!(responses_for("hello").contains(&message.text));
}
