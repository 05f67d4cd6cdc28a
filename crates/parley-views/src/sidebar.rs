//! Conversation sidebar.

use parley_core::markdown::escape_html;
use parley_core::state::ChatState;

/// Renders the sidebar: "New Chat" on top, then conversations newest first
/// with the active one highlighted.
pub fn render(state: &ChatState) -> String {
    let mut html = String::from(
        "<aside class=\"sidebar\">\n\
         <div class=\"sidebar-header\"><button class=\"new-chat-btn\" data-action=\"new-chat\">New Chat</button></div>\n\
         <nav class=\"chat-list\">\n",
    );

    for conversation in state.conversations.iter().rev() {
        let id = escape_html(&conversation.id);
        let class = if conversation.id == state.active_id {
            "chat-item active"
        } else {
            "chat-item"
        };
        html.push_str(&format!(
            "<div class=\"{class}\" data-action=\"select-chat\" data-id=\"{id}\">\
             <span class=\"chat-title\">{title}</span>\
             <span class=\"chat-actions\">\
             <button class=\"rename-btn\" data-action=\"rename-chat\" data-id=\"{id}\" title=\"Rename\">Rename</button>\
             <button class=\"delete-btn\" data-action=\"delete-chat\" data-id=\"{id}\" title=\"Delete\">Delete</button>\
             </span></div>\n",
            title = escape_html(&conversation.title),
        ));
    }

    html.push_str("</nav>\n</aside>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::conversation::Conversation;

    fn state_with_titles(titles: &[&str]) -> ChatState {
        let mut state = ChatState::new();
        state.conversations = titles
            .iter()
            .map(|title| {
                let mut conversation = Conversation::new();
                conversation.title = title.to_string();
                conversation
            })
            .collect();
        state.active_id = state.conversations[0].id.clone();
        state
    }

    #[test]
    fn test_newest_first_with_active_highlight() {
        let state = state_with_titles(&["oldest", "middle", "newest"]);
        let html = render(&state);

        let newest = html.find("newest").unwrap();
        let middle = html.find("middle").unwrap();
        let oldest = html.find("oldest").unwrap();
        assert!(newest < middle && middle < oldest);

        assert_eq!(html.matches("chat-item active").count(), 1);
        let active = html.find("chat-item active").unwrap();
        assert!(active > middle);
    }

    #[test]
    fn test_titles_are_escaped() {
        let state = state_with_titles(&["<img src=x onerror=alert(1)>"]);
        let html = render(&state);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }
}
