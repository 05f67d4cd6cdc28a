//! Full chat page.

use crate::rename_dialog::RenameDialog;
use crate::{input_bar, message_list, sidebar, typing_indicator};
use parley_core::composer::ComposerState;
use parley_core::markdown::escape_html;
use parley_core::notice::{Notice, NoticeLevel};
use parley_core::state::ChatState;

const STYLE: &str = "\
body{margin:0;display:flex;height:100vh;font-family:system-ui,sans-serif;background:#0f1117;color:#e6e6e6}\
.sidebar{width:18rem;border-right:1px solid #2a2d36;display:flex;flex-direction:column}\
.chat-item{padding:.75rem;cursor:pointer}.chat-item.active{background:#1e2130;border-left:2px solid #7c5cff}\
main{flex:1;display:flex;flex-direction:column}.message-list{flex:1;overflow-y:auto;padding:1rem}\
.message{display:flex;padding:.75rem 0}.message.user{justify-content:flex-end}\
.bubble{max-width:70%;border-radius:1rem;padding:.75rem 1.25rem;background:#1a1d27}\
.message.user .bubble{background:#7c5cff;color:#fff}\
.code-block pre{background:#11131a;padding:1rem;overflow-x:auto}\
.generated-image img{max-width:100%;border-radius:.5rem}\
.toast{position:fixed;top:1rem;right:1rem;padding:.5rem 1rem;border-radius:.5rem;background:#1e2130}\
.toast.error{background:#5c1f24}";

/// Renders the whole page. `notice` is shown as a toast.
///
/// The rename dialog for the active conversation is always present and
/// starts closed.
pub fn render(state: &ChatState, composer: &ComposerState, notice: Option<&Notice>) -> String {
    let title = state
        .active()
        .map(|c| escape_html(&c.title))
        .unwrap_or_default();

    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Parley</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"
    );

    html.push_str(&sidebar::render(state));
    html.push_str("<main class=\"chat\">\n");
    if let Ok(conversation) = state.active() {
        html.push_str(&message_list::render(conversation));
    }
    html.push_str(&typing_indicator::render(state));
    html.push_str(&input_bar::render(composer, state.is_processing));
    html.push_str("</main>\n");

    if let Ok(dialog) = RenameDialog::open(state, &state.active_id) {
        html.push_str(&dialog.render());
    }
    if let Some(notice) = notice {
        html.push_str(&render_notice(notice));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!(
        "<div class=\"toast {level}\" role=\"status\">{}</div>\n",
        escape_html(&notice.text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::conversation::Message;

    #[test]
    fn test_page_contains_all_regions() {
        let mut state = ChatState::new();
        let id = state.active_id.clone();
        state.find_mut(&id).unwrap().push(Message::user("Tell me a story"));
        state.is_processing = true;

        let html = render(&state, &ComposerState::new(), None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Tell me a story - Parley</title>"));
        assert!(html.contains("class=\"sidebar\""));
        assert!(html.contains("class=\"message-list\""));
        assert!(html.contains("typing"));
        assert!(html.contains("class=\"input-bar\""));
        assert!(html.contains("<dialog class=\"rename-dialog\">"));
        assert!(html.contains(&format!("data-id=\"{}\"", state.active_id)));
        assert!(!html.contains("toast"));
    }

    #[test]
    fn test_notice_is_rendered_as_toast() {
        let state = ChatState::new();
        let notice = Notice::error("You need at least one chat");

        let html = render(&state, &ComposerState::new(), Some(&notice));
        assert!(!html.contains("<dialog class=\"rename-dialog\" open"));
        assert!(html.contains("<div class=\"toast error\" role=\"status\">You need at least one chat</div>"));
    }
}
