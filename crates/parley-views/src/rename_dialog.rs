//! Rename dialog.

use parley_core::error::{ParleyError, Result};
use parley_core::markdown::escape_html;
use parley_core::state::ChatState;

/// A rename dialog, pre-filled with the current title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDialog {
    pub conversation_id: String,
    pub title: String,
}

impl RenameDialog {
    pub fn open(state: &ChatState, conversation_id: &str) -> Result<Self> {
        let conversation = state
            .find(conversation_id)
            .ok_or_else(|| ParleyError::not_found("Conversation", conversation_id))?;
        Ok(Self {
            conversation_id: conversation.id.clone(),
            title: conversation.title.clone(),
        })
    }

    /// The title to submit, or `None` when the input is blank.
    pub fn submission(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }

    /// Renders the dialog closed; the page opens it on demand.
    pub fn render(&self) -> String {
        format!(
            "<dialog class=\"rename-dialog\">\
             <form method=\"dialog\" data-action=\"rename-chat\" data-id=\"{id}\">\
             <h2>Rename Chat</h2>\
             <input name=\"title\" value=\"{title}\" placeholder=\"Enter new chat name...\" autofocus>\
             <div class=\"dialog-footer\">\
             <button type=\"button\" data-action=\"cancel\">Cancel</button>\
             <button type=\"submit\">Rename</button>\
             </div></form></dialog>\n",
            id = escape_html(&self.conversation_id),
            title = escape_html(&self.title),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefilled_with_current_title() {
        let state = ChatState::new();
        let dialog = RenameDialog::open(&state, &state.active_id).unwrap();
        assert_eq!(dialog.title, "New Conversation");
        assert!(dialog.render().contains("value=\"New Conversation\""));
    }

    #[test]
    fn test_unknown_conversation() {
        let err = RenameDialog::open(&ChatState::new(), "c_missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_submission_is_trimmed_and_rejects_blank() {
        let mut dialog = RenameDialog {
            conversation_id: "c_1".to_string(),
            title: "  Weekend plans ".to_string(),
        };
        assert_eq!(dialog.submission(), Some("Weekend plans"));

        dialog.title = "   ".to_string();
        assert_eq!(dialog.submission(), None);
    }

    #[test]
    fn test_title_is_escaped_in_attribute() {
        let dialog = RenameDialog {
            conversation_id: "c_1".to_string(),
            title: "\" onfocus=\"alert(1)".to_string(),
        };
        assert!(dialog.render().contains("value=\"&quot; onfocus=&quot;alert(1)\""));
    }
}
