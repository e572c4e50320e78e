pub mod agent;
pub mod scheduler;
pub mod simulator;

pub use agent::{LumiAgent, ResolvedReply};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};
pub use simulator::{ConversationSimulator, ThinkingDelay};
