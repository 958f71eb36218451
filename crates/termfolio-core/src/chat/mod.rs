//! Chat assistant panel state and the backend seam.
//!
//! At most one request is in flight. Every request carries the panel
//! generation it was issued under; closing or reopening the panel bumps the
//! generation, so a reply for a dismissed panel is dropped instead of being
//! appended to a conversation that no longer exists.

pub mod gemini;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::content::Portfolio;

pub use gemini::GeminiClient;

pub const APOLOGY: &str =
    "I apologize, but I'm having trouble processing your request. Please try again or switch chat modes.";
pub const ERROR_BANNER: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat backend is not configured (set TERMFOLIO_GEMINI_API_KEY)")]
    NotConfigured,
    #[error("Chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Chat backend returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Chat backend returned no text")]
    EmptyResponse,
}

/// A text-in, text-out generative model.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredBackend;

#[async_trait]
impl ChatBackend for UnconfiguredBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, ChatError> {
        Err(ChatError::NotConfigured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
    /// Questions are wrapped in a prompt carrying the portfolio content.
    #[default]
    Personal,
    /// Questions go to the model verbatim.
    General,
}

impl ChatMode {
    pub fn toggled(self) -> Self {
        match self {
            ChatMode::Personal => ChatMode::General,
            ChatMode::General => ChatMode::Personal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChatMode::Personal => "personal",
            ChatMode::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
    /// For replies, the id of the user message being answered.
    pub parent_id: Option<u64>,
    /// Emoji reactions in the order they were added.
    pub reactions: Vec<String>,
}

/// Identifies the request a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTicket {
    pub generation: u64,
    pub parent_id: u64,
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub ticket: ChatTicket,
    pub prompt: String,
}

/// A finished request, ready to be settled.
#[derive(Debug)]
pub struct ChatReply {
    pub ticket: ChatTicket,
    pub result: Result<String, ChatError>,
}

/// Run `request` against `backend`. The ticket travels with the result.
pub async fn send(backend: &dyn ChatBackend, request: ChatRequest) -> ChatReply {
    let result = backend.generate(&request.prompt).await;
    ChatReply {
        ticket: request.ticket,
        result,
    }
}

#[derive(Debug)]
pub struct ChatSession {
    owner: String,
    messages: Vec<ChatMessage>,
    mode: ChatMode,
    generation: u64,
    busy: bool,
    open: bool,
    next_id: u64,
    error: Option<&'static str>,
}

impl ChatSession {
    /// A closed panel for the portfolio owned by `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            messages: Vec::new(),
            mode: ChatMode::default(),
            generation: 0,
            busy: false,
            open: false,
            next_id: 1,
            error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Transient banner shown after a failed request.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hi there! I'm {owner}'s AI assistant. Ask me anything about {owner}, their projects, \
             skills, or experience, or switch to general mode for broader questions!",
            owner = self.owner
        )
    }

    /// Open a fresh conversation with the greeting.
    pub fn open(&mut self) {
        self.generation += 1;
        self.busy = false;
        self.open = true;
        self.mode = ChatMode::default();
        self.error = None;
        self.messages.clear();
        let greeting = self.greeting();
        self.push(ChatRole::Assistant, greeting, None);
        tracing::info!(generation = self.generation, "Chat opened");
    }

    /// Dismiss the panel. Any in-flight result becomes stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.busy = false;
        self.open = false;
        tracing::info!(generation = self.generation, "Chat closed");
    }

    /// Record a user message and build its request. Returns `None` when the
    /// panel is closed, a request is already pending, or `text` is blank.
    pub fn begin(&mut self, text: &str, content: &Portfolio) -> Option<ChatRequest> {
        if !self.open || self.busy || text.trim().is_empty() {
            return None;
        }
        let prompt = match self.mode {
            ChatMode::Personal => personal_prompt(&self.owner, content, text),
            ChatMode::General => text.to_string(),
        };
        let parent_id = self.push(ChatRole::User, text.to_string(), None);
        self.busy = true;
        self.error = None;
        tracing::debug!(parent_id, mode = self.mode.name(), "Chat request started");
        Some(ChatRequest {
            ticket: ChatTicket {
                generation: self.generation,
                parent_id,
            },
            prompt,
        })
    }

    /// Apply a finished request. Exactly one assistant message is appended
    /// for the pending ticket; stale or repeated tickets change nothing. Returns whether
    /// the result was applied.
    pub fn settle(&mut self, reply: ChatReply) -> bool {
        let ChatReply { ticket, result } = reply;
        if ticket.generation != self.generation || !self.busy {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale chat result"
            );
            return false;
        }
        self.busy = false;
        match result {
            Ok(text) => {
                self.push(ChatRole::Assistant, text, Some(ticket.parent_id));
            }
            Err(err) => {
                tracing::error!(error = %err, "Chat request failed");
                self.error = Some(ERROR_BANNER);
                self.push(ChatRole::Assistant, APOLOGY.to_string(), Some(ticket.parent_id));
            }
        }
        true
    }

    /// Flip between personal and general mode and announce the switch.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        let notice = match self.mode {
            ChatMode::General => "Switched to general mode. I can now answer questions about any \
                                  topic using my knowledge base."
                .to_string(),
            ChatMode::Personal => format!(
                "Switched to personal mode. I will now focus on answering questions about {}.",
                self.owner
            ),
        };
        self.push(ChatRole::Assistant, notice, None);
    }

    /// Append `emoji` to message `id`. False when there is no such message
    /// or the emoji is blank.
    pub fn add_reaction(&mut self, id: u64, emoji: &str) -> bool {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return false;
        }
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.reactions.push(emoji.to_string());
                true
            }
            None => false,
        }
    }

    /// Id of the newest assistant message.
    pub fn last_reply_id(&self) -> Option<u64> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| m.id)
    }

    fn push(&mut self, role: ChatRole, content: String, parent_id: Option<u64>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            timestamp: Local::now(),
            parent_id,
            reactions: Vec::new(),
        });
        id
    }
}

/// Wrap `question` with the portfolio content for personal mode.
pub fn personal_prompt(owner: &str, content: &Portfolio, question: &str) -> String {
    let projects = content
        .projects
        .iter()
        .map(|(name, details)| format!("- {name}: {}", details.description))
        .collect::<Vec<_>>()
        .join("\n");
    let contacts = content
        .contact
        .iter()
        .map(|(platform, link)| format!("- {platform}: {link}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI assistant for {owner}, a software engineer. Here's the context about {owner}:\n\
         \n\
         Bio: {bio}\n\
         \n\
         Projects:\n\
         {projects}\n\
         \n\
         Contact Information:\n\
         {contacts}\n\
         \n\
         Based on this information, please provide a natural and informative response to this question:\n\
         {question}\n\
         \n\
         Keep the response concise, professional, and focused on {owner}'s information.",
        bio = content.about.bio,
    )
}
