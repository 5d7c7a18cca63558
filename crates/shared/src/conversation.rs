use serde::{Deserialize, Serialize};

pub const INITIAL_GREETING: &str = "👋 Hello! I'm your dedicated NCERT and CBSE problem solving tutor.

I can help you with:
📖 Mathematics - Algebra, Geometry, Calculus
🔬 Science - Physics, Chemistry, Biology
🌍 Social Studies - History, Geography, Civics
📝 English - Literature, Grammar, Writing
💻 Computer Science - Programming, Algorithms

What subject or specific problem would you like help with today?";

pub const RESET_GREETING: &str =
    "Chat history cleared! How can I help you with your NCERT or CBSE studies today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Prefix used when a conversation is flattened into a single text prompt.
    pub const fn transcript_label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered, append-only chat transcript for one session.
///
/// The first message is always the assistant greeting. It is shown to the
/// student but never forwarded to a model, so [`Conversation::context`] starts
/// after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_greeting(INITIAL_GREETING)
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Records one resolved exchange in conversational order.
    pub fn record_exchange(&mut self, user_input: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(Message::user(user_input));
        self.messages.push(Message::assistant(reply));
    }

    pub fn reset(&mut self) {
        *self = Self::with_greeting(RESET_GREETING);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn context(&self) -> &[Message] {
        &self.messages[1..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
