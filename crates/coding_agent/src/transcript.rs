//! Human-facing rendering of the conversation.

use agent_provider::{ChatMessage, Role};
use apply_patch_engine::{extract_blocks, Block, EditDescriptor};

/// Renders one edit as `Edit lines [start, end):` followed by its code in a plain fence.
#[must_use]
pub fn render_edit(edit: &EditDescriptor) -> String {
    let code = edit.code.trim_end_matches(['\n', '\r']);
    format!("Edit lines [{}, {}):\n```\n{code}\n```", edit.start, edit.end)
}

/// Replaces edit blocks in assistant text with readable range annotations.
///
/// Returns `None` when the text has no edit blocks or does not extract cleanly; callers
/// show such text as it is.
#[must_use]
pub fn render_edit_blocks(text: &str) -> Option<String> {
    let mut parts = Vec::new();
    let mut saw_edit = false;

    for block in extract_blocks(text) {
        match block.ok()? {
            Block::Prose(prose) => {
                let prose = prose.trim_end();
                if !prose.is_empty() {
                    parts.push(prose.to_string());
                }
            }
            Block::Edit(edit) => {
                saw_edit = true;
                parts.push(render_edit(&edit));
            }
        }
    }

    saw_edit.then(|| parts.join("\n"))
}

/// Display form of `message`, or `None` for messages never shown to the user.
#[must_use]
pub fn display_message(message: &ChatMessage) -> Option<ChatMessage> {
    if message.is_context_announcement() {
        return None;
    }

    if message.role == Role::Assistant {
        if let Some(rendered) = render_edit_blocks(&message.content) {
            return Some(ChatMessage::assistant(rendered));
        }
    }
    Some(message.clone())
}

#[must_use]
pub fn display_messages(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages.iter().filter_map(display_message).collect()
}
