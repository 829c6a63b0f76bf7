use chrono::Local;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Title every chat carries until its first user message arrives
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Number of characters kept from the first message when deriving a title
pub const TITLE_MAX_CHARS: usize = 50;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the person chatting
    User,
    /// Message produced by the model
    Assistant,
}

/// A single message inside a chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message
    pub role: Role,
    /// Message text
    pub content: String,
    /// Local time the message was recorded
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a user message stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }

    /// Creates an assistant message stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }
}

/// One conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier (ULID)
    pub id: String,
    /// Display title, derived once from the first user message
    pub title: String,
    /// Local creation time
    pub created_at: String,
    /// Ordered messages, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Chat {
    /// Creates an empty chat with a fresh id and the default title
    ///
    /// # Examples
    ///
    /// ```
    /// use quickchat::storage::{Chat, DEFAULT_CHAT_TITLE};
    ///
    /// let chat = Chat::new();
    /// assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
    /// assert!(chat.messages.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            id: new_chat_id(),
            title: DEFAULT_CHAT_TITLE.to_string(),
            created_at: now_timestamp(),
            messages: Vec::new(),
        }
    }

    /// Sets the title from `message` if the chat still has the default title
    ///
    /// Returns `true` when the title changed.
    pub fn derive_title(&mut self, message: &str) -> bool {
        if self.title != DEFAULT_CHAT_TITLE || message.is_empty() {
            return false;
        }
        self.title = title_from_message(message);
        true
    }

    /// Drops every message while keeping id, title and creation time
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Case-insensitive match against the title or any message body
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole persisted state: every chat, in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    /// All chats
    #[serde(default)]
    pub chats: Vec<Chat>,
}

impl HistoryDocument {
    /// Find a chat by id
    pub fn find(&self, id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    /// Find a chat by id for mutation
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id == id)
    }

    /// The most recently created chat
    pub fn latest_mut(&mut self) -> Option<&mut Chat> {
        self.chats.last_mut()
    }

    /// Append a fresh chat and return a handle to it
    pub fn push_new(&mut self) -> &mut Chat {
        self.chats.push(Chat::new());
        let last = self.chats.len() - 1;
        &mut self.chats[last]
    }

    /// Resolve the chat a message should go to
    ///
    /// Uses the chat matching `chat_id` when present, otherwise the most
    /// recent chat, otherwise a newly created one.
    pub fn resolve_target(&mut self, chat_id: Option<&str>) -> &mut Chat {
        let index = chat_id
            .filter(|id| !id.is_empty())
            .and_then(|id| self.chats.iter().position(|c| c.id == id))
            .or_else(|| self.chats.len().checked_sub(1));

        match index {
            Some(i) => &mut self.chats[i],
            None => self.push_new(),
        }
    }

    /// Remove the chat with `id`; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.chats.len();
        self.chats.retain(|c| c.id != id);
        self.chats.len() != before
    }

    /// Chats whose title or messages contain `term`, case-insensitively
    ///
    /// An empty (or whitespace-only) term returns every chat.
    pub fn search(&self, term: &str) -> Vec<Chat> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.chats.clone();
        }
        self.chats
            .iter()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect()
    }
}

/// Generate a new unique chat id
///
/// ULIDs sort by creation time and do not collide for chats created in
/// the same instant.
pub fn new_chat_id() -> String {
    Ulid::new().to_string()
}

/// Current local time in the history file's timestamp format
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Title for a chat whose first message is `message`
///
/// Long messages are cut to `TITLE_MAX_CHARS` characters followed by `...`.
pub fn title_from_message(message: &str) -> String {
    if message.chars().count() > TITLE_MAX_CHARS {
        let head: String = message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_with(title: &str, messages: &[&str]) -> Chat {
        let mut chat = Chat::new();
        chat.title = title.to_string();
        chat.messages = messages.iter().map(|m| ChatMessage::user(*m)).collect();
        chat
    }

    #[test]
    fn test_new_chat_defaults() {
        let chat = Chat::new();
        assert_eq!(chat.title, "New Chat");
        assert!(chat.messages.is_empty());
        assert!(!chat.id.is_empty());
        assert!(chrono::NaiveDateTime::parse_from_str(&chat.created_at, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_chat_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..100).map(|_| new_chat_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_title_short_message_kept() {
        assert_eq!(title_from_message("Hello"), "Hello");
    }

    #[test]
    fn test_title_exactly_fifty_chars_kept() {
        let message = "a".repeat(50);
        assert_eq!(title_from_message(&message), message);
    }

    #[test]
    fn test_title_long_message_truncated() {
        let message = "x".repeat(60);
        let title = title_from_message(&message);
        assert_eq!(title, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_title_truncates_on_char_boundary() {
        let message = "é".repeat(55);
        let title = title_from_message(&message);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_derive_title_only_once() {
        let mut chat = Chat::new();
        assert!(chat.derive_title("First question"));
        assert!(!chat.derive_title("Second question"));
        assert_eq!(chat.title, "First question");
    }

    #[test]
    fn test_clear_preserves_metadata() {
        let mut chat = chat_with("Greeting", &["hi", "there"]);
        let (id, created_at) = (chat.id.clone(), chat.created_at.clone());
        chat.clear();
        assert!(chat.messages.is_empty());
        assert_eq!(chat.id, id);
        assert_eq!(chat.title, "Greeting");
        assert_eq!(chat.created_at, created_at);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("ok")).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }

    #[test]
    fn test_document_parses_flat_layout() {
        let json = r#"{
          "chats": [{
            "id": "1718000000.123",
            "title": "Hello",
            "created_at": "2024-06-10 09:00:00",
            "messages": [
              {"role": "user", "content": "Hello", "timestamp": "2024-06-10 09:00:01"},
              {"role": "assistant", "content": "Hi!", "timestamp": "2024-06-10 09:00:02"}
            ]
          }]
        }"#;
        let doc: HistoryDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.chats.len(), 1);
        assert_eq!(doc.chats[0].messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_resolve_target_prefers_matching_id() {
        let mut doc = HistoryDocument::default();
        doc.chats.push(chat_with("a", &[]));
        doc.chats.push(chat_with("b", &[]));
        let first_id = doc.chats[0].id.clone();

        let chat = doc.resolve_target(Some(&first_id));
        assert_eq!(chat.title, "a");
    }

    #[test]
    fn test_resolve_target_falls_back_to_latest() {
        let mut doc = HistoryDocument::default();
        doc.chats.push(chat_with("a", &[]));
        doc.chats.push(chat_with("b", &[]));

        assert_eq!(doc.resolve_target(Some("missing")).title, "b");
        assert_eq!(doc.resolve_target(None).title, "b");
        assert_eq!(doc.resolve_target(Some("")).title, "b");
        assert_eq!(doc.chats.len(), 2);
    }

    #[test]
    fn test_resolve_target_creates_when_empty() {
        let mut doc = HistoryDocument::default();
        let chat = doc.resolve_target(Some("missing"));
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
        assert_eq!(doc.chats.len(), 1);
    }

    #[test]
    fn test_remove_only_matching_chat() {
        let mut doc = HistoryDocument::default();
        doc.chats.push(chat_with("a", &[]));
        doc.chats.push(chat_with("b", &[]));
        let id = doc.chats[0].id.clone();

        assert!(doc.remove(&id));
        assert_eq!(doc.chats.len(), 1);
        assert_eq!(doc.chats[0].title, "b");
        assert!(!doc.remove("missing"));
        assert_eq!(doc.chats.len(), 1);
    }

    #[test]
    fn test_search_matches_message_body() {
        let mut doc = HistoryDocument::default();
        doc.chats.push(chat_with("Weather", &["is it sunny"]));
        doc.chats.push(chat_with("Cooking", &["How long to boil an EGG?"]));

        let found = doc.search("egg");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Cooking");
    }

    #[test]
    fn test_search_matches_title_case_insensitive() {
        let mut doc = HistoryDocument::default();
        doc.chats.push(chat_with("Weather Report", &[]));
        assert_eq!(doc.search("  WEATHER ").len(), 1);
        assert!(doc.search("snow").is_empty());
    }

    #[test]
    fn test_search_empty_term_returns_all() {
        let mut doc = HistoryDocument::default();
        doc.chats.push(chat_with("a", &[]));
        doc.chats.push(chat_with("b", &[]));
        assert_eq!(doc.search("   ").len(), 2);
    }
}
