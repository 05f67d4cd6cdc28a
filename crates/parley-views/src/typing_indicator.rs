//! "Assistant is typing" bubble.

use parley_core::state::ChatState;

const DOTS: &str = "<div class=\"message ai typing\"><div class=\"bubble\">\
<span class=\"dot\"></span><span class=\"dot\"></span><span class=\"dot\"></span>\
</div></div>\n";

/// Shown only while a reply is in flight.
pub fn render(state: &ChatState) -> String {
    if state.is_processing {
        DOTS.to_string()
    } else {
        String::new()
    }
}
