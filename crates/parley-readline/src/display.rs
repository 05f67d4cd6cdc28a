//! Terminal rendering of messages and notices.

use colored::Colorize;
use parley_core::conversation::{Conversation, Message, MessageRole};
use parley_core::notice::{Notice, NoticeLevel};
use parley_core::state::ChatState;

pub fn print_message(message: &Message) {
    match message.role {
        MessageRole::User => {
            if message.has_image() {
                println!("{}", "[Image attached]".bright_black());
            }
            for line in message.text.lines() {
                println!("{}", format!("> {}", line).green());
            }
        }
        MessageRole::Assistant => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
            if let Some(url) = message.generated_image() {
                println!("{}", format!("[image] {}", url).bright_magenta());
            }
        }
    }
}

pub fn print_conversation(conversation: &Conversation) {
    println!("{}", format!("=== {} ===", conversation.title).bright_magenta().bold());
    for message in &conversation.messages {
        print_message(message);
        println!();
    }
}

/// Lists conversations newest first, numbered the way `/select` expects.
pub fn print_list(state: &ChatState) {
    for (n, conversation) in state.conversations.iter().rev().enumerate() {
        let line = format!("{:>3}. {}", n + 1, conversation.title);
        if conversation.id == state.active_id {
            println!("{}", format!("{} *", line).bright_cyan().bold());
        } else {
            println!("{}", line);
        }
    }
}

pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{}", notice.text.bright_green()),
        NoticeLevel::Info => println!("{}", notice.text.yellow()),
        NoticeLevel::Error => eprintln!("{}", notice.text.red()),
    }
}

/// The conversation at a 1-based `/list` position.
pub fn conversation_at(state: &ChatState, n: usize) -> Option<&Conversation> {
    n.checked_sub(1)
        .and_then(|i| state.conversations.iter().rev().nth(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_list_order() {
        let mut state = ChatState::new();
        let oldest = state.active_id.clone();
        let newest = Conversation::new();
        let newest_id = newest.id.clone();
        state.conversations.push(newest);

        assert_eq!(conversation_at(&state, 1).unwrap().id, newest_id);
        assert_eq!(conversation_at(&state, 2).unwrap().id, oldest);
        assert!(conversation_at(&state, 0).is_none());
        assert!(conversation_at(&state, 3).is_none());
    }
}
