pub mod chat;
pub mod commands;
pub mod config;
pub mod content;
pub mod history;
pub mod markup;
pub mod output;
pub mod render;
pub mod session;
pub mod tracing_setup;
pub mod vocabulary;

pub use chat::{ChatBackend, ChatError, ChatMessage, ChatMode, ChatRole, ChatSession, GeminiClient};
pub use commands::{CommandOutcome, Mode, Registry};
pub use config::{ChatConfig, ConfigError, CoreConfig};
pub use content::{ContentError, Portfolio};
pub use history::PromptInput;
pub use output::{classify, OutputLine};
pub use render::{LineRenderer, SpanStyle, StyledLine, StyledSpan};
pub use session::{Session, SubmitEvent};
pub use vocabulary::{SubVerb, Verb, Vocabulary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
