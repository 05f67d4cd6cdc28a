//! Message thread.

use chrono::{Local, TimeZone};
use parley_core::conversation::{Conversation, Message, MessageRole};
use parley_core::markdown::{self, escape_html};

/// File name offered when downloading a generated image.
const DOWNLOAD_NAME: &str = "generated-image.png";

pub fn render(conversation: &Conversation) -> String {
    let mut html = String::from("<section class=\"message-list\">\n");
    for message in &conversation.messages {
        html.push_str(&render_message(message));
    }
    html.push_str("</section>\n");
    html
}

/// One bubble: user messages align right, assistant messages left.
pub fn render_message(message: &Message) -> String {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "ai",
    };

    let mut html = format!("<div class=\"message {role}\"><div class=\"bubble\">");

    if message.has_image() {
        html.push_str("<div class=\"image-badge\">Image attached</div>");
    }

    html.push_str(&format!(
        "<div class=\"message-text\">{}</div>",
        markdown::format(&message.text)
    ));

    if let Some(url) = message.generated_image() {
        let url = escape_html(url);
        let alt = message
            .meta
            .as_ref()
            .and_then(|m| m.image_prompt.as_deref())
            .map(escape_html)
            .unwrap_or_else(|| "Generated".to_string());
        html.push_str(&format!(
            "<figure class=\"generated-image\"><img src=\"{url}\" alt=\"{alt}\">\
             <a class=\"download-btn\" href=\"{url}\" download=\"{DOWNLOAD_NAME}\">Download</a></figure>",
        ));
    }

    if let Some(time) = format_time(message.time) {
        html.push_str(&format!("<time class=\"message-time\">{}</time>", time));
    }

    html.push_str("</div></div>\n");
    html
}

fn format_time(millis: i64) -> Option<String> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%H:%M").to_string())
}
