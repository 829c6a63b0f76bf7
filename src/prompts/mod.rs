//! Prompt builders for the completion gateway
//!
//! Both prompts ask the model for a one-sentence answer. The context
//! variant replays recent turns as a plain-text transcript.

use crate::storage::{ChatMessage, Role};

/// Instruction prefix for a prompt without history
const BRIEF_INSTRUCTION: &str = "Answer briefly in 1 sentence:";

/// Header for a prompt that carries conversation history
const CONTEXT_HEADER: &str = "Answer briefly in 1 sentence. Here's our conversation:";

/// Builds a prompt for a single message with no history
///
/// # Examples
///
/// ```
/// use quickchat::prompts::build_brief_prompt;
///
/// let prompt = build_brief_prompt("What is Rust?");
/// assert_eq!(prompt, "Answer briefly in 1 sentence: What is Rust?");
/// ```
pub fn build_brief_prompt(message: &str) -> String {
    format!("{} {}", BRIEF_INSTRUCTION, message)
}

/// Builds a transcript prompt from the trailing `limit` history entries
///
/// User entries are labelled `Human`, everything else `Assistant`. The
/// prompt ends with the new human turn and an open `Assistant:` cue.
///
/// # Examples
///
/// ```
/// use quickchat::prompts::build_context_prompt;
/// use quickchat::storage::ChatMessage;
///
/// let history = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];
/// let prompt = build_context_prompt("How are you?", &history, 4);
/// assert!(prompt.contains("Human: Hi\nAssistant: Hello!\n"));
/// assert!(prompt.ends_with("\nHuman: How are you?\nAssistant:"));
/// ```
pub fn build_context_prompt(message: &str, history: &[ChatMessage], limit: usize) -> String {
    let start = history.len().saturating_sub(limit);

    let mut prompt = format!("{}\n\n", CONTEXT_HEADER);
    for entry in &history[start..] {
        let speaker = match entry.role {
            Role::User => "Human",
            Role::Assistant => "Assistant",
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&entry.content);
        prompt.push('\n');
    }
    prompt.push_str("\nHuman: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant:");
    prompt
}
