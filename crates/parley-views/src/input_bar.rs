//! Composer input bar.

use parley_core::composer::{ComposerMode, ComposerState};
use parley_core::markdown::escape_html;

/// Renders the mode indicator, image preview, textarea and action buttons.
///
/// Everything is disabled while a reply is pending; send is also disabled
/// for a blank draft.
pub fn render(composer: &ComposerState, is_processing: bool) -> String {
    let mut html = String::from("<footer class=\"input-bar\">\n");

    match composer.mode() {
        ComposerMode::ImageGeneration => html.push_str(
            "<div class=\"mode-indicator generation\">Image Generation Mode</div>\n",
        ),
        ComposerMode::ImageAnalysis => html.push_str(
            "<div class=\"mode-indicator analysis\">Image Analysis Mode</div>\n",
        ),
        ComposerMode::Chat => {}
    }

    if let Some(image) = &composer.pending_image {
        html.push_str(&format!(
            "<div class=\"image-preview\"><img src=\"{}\" alt=\"Preview\">\
             <button class=\"clear-image-btn\" data-action=\"clear-image\">Remove</button></div>\n",
            escape_html(&image.data_url)
        ));
    }

    let disabled = if is_processing { " disabled" } else { "" };
    let send_disabled = if composer.can_send(is_processing) {
        ""
    } else {
        " disabled"
    };
    let generation_class = if composer.image_generation {
        "toggle-generation-btn active"
    } else {
        "toggle-generation-btn"
    };

    html.push_str(&format!(
        "<div class=\"composer\">\
         <textarea name=\"draft\" placeholder=\"{placeholder}\"{disabled}>{draft}</textarea>\
         <button class=\"upload-image-btn\" data-action=\"attach-image\"{disabled}>Image</button>\
         <button class=\"{generation_class}\" data-action=\"toggle-generation\"{disabled}>Generate</button>\
         <button class=\"voice-btn\" data-action=\"record-voice\"{disabled}>Voice</button>\
         <button class=\"tts-btn\" data-action=\"play-tts\"{disabled}>Speak</button>\
         <button class=\"send-btn\" data-action=\"send\"{send_disabled}>Send</button>\
         </div>\n</footer>\n",
        placeholder = escape_html(composer.placeholder()),
        draft = escape_html(&composer.draft),
    ));
    html
}
