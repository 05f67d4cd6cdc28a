//! Markdown-to-HTML formatting for message text.
//!
//! Supports the small subset chat replies use: `#`/`##`/`###` headings,
//! `**bold**`, `*italic*`, `` `inline code` ``, fenced code blocks and line
//! breaks.
//!
//! Message text is treated as untrusted. Everything outside the markup this
//! module emits is HTML-escaped, so the output is safe to insert as markup.
//! Code (fenced and inline) is carved out before any inline rule runs and is
//! restored last, so no rule can rewrite code content.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(\w+)?\n([\s\S]*?)```").expect("fenced block pattern"));
static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\x00]+)`").expect("inline code pattern"));
static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("h3 pattern"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("h2 pattern"));
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("h1 pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern"));
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x00([BI])(\d+)\x00").expect("placeholder pattern"));

/// A fenced code block as written in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

/// Formats message text as HTML.
pub fn format(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // NUL delimits placeholders below and never appears in real messages.
    let text = text.replace('\0', "");

    let mut blocks = Vec::new();
    let carved = FENCED_BLOCK.replace_all(&text, |caps: &Captures| {
        let language = caps.get(1).map(|m| m.as_str());
        blocks.push(render_code_block(language, &caps[2]));
        format!("\0B{}\0", blocks.len() - 1)
    });

    let escaped = escape_html(&carved);

    // A code span never crosses a carved block.
    let mut inline = Vec::new();
    let carved = INLINE_CODE.replace_all(&escaped, |caps: &Captures| {
        // Already escaped along with the surrounding text.
        inline.push(format!("<code class=\"inline-code\">{}</code>", &caps[1]));
        format!("\0I{}\0", inline.len() - 1)
    });

    let html = H3.replace_all(&carved, "<h3>${1}</h3>");
    let html = H2.replace_all(&html, "<h2>${1}</h2>");
    let html = H1.replace_all(&html, "<h1>${1}</h1>");
    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");
    let html = html.replace('\n', "<br>");

    PLACEHOLDER
        .replace_all(&html, |caps: &Captures| {
            let index: usize = caps[2].parse().unwrap_or(usize::MAX);
            let restored = match &caps[1] {
                "B" => blocks.get(index),
                _ => inline.get(index),
            };
            restored.cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Returns every fenced code block in `text`, in order.
///
/// This is the raw code the copy button puts on the clipboard.
pub fn code_blocks(text: &str) -> Vec<CodeBlock> {
    FENCED_BLOCK
        .captures_iter(text)
        .map(|caps| CodeBlock {
            language: caps.get(1).map(|m| m.as_str().to_string()),
            code: caps[2].to_string(),
        })
        .collect()
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_code_block(language: Option<&str>, code: &str) -> String {
    let escaped = escape_html(code);
    let class = match language {
        Some(lang) => format!(" class=\"language-{}\"", lang),
        None => String::new(),
    };
    format!(
        "<div class=\"code-block\"><pre><code{class}>{escaped}</code></pre>\
         <button class=\"copy-code-btn\" data-code=\"{escaped}\">Copy</button></div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(format(""), "");
    }

    #[test]
    fn test_bold_wraps_once() {
        let html = format("**bold**");
        assert_eq!(html, "<strong>bold</strong>");
        assert_eq!(html.matches("<strong>").count(), 1);
    }

    #[test]
    fn test_bold_matched_before_italic() {
        assert_eq!(
            format("**strong** and *soft*"),
            "<strong>strong</strong> and <em>soft</em>"
        );
    }

    #[test]
    fn test_headings_by_level() {
        assert_eq!(
            format("# One\n## Two\n### Three"),
            "<h1>One</h1><br><h2>Two</h2><br><h3>Three</h3>"
        );
    }

    #[test]
    fn test_heading_marker_needs_line_start() {
        assert_eq!(format("not # a heading"), "not # a heading");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(format("a\nb"), "a<br>b");
    }

    #[test]
    fn test_script_in_fenced_block_is_escaped() {
        let html = format("```html\n<script>alert(1)</script>\n```");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("class=\"language-html\""));
        assert!(html.contains("copy-code-btn"));
    }

    #[test]
    fn test_fenced_block_keeps_newlines_and_markers() {
        let html = format("```\nlet x = **y**;\nlet z = `w`;\n```");
        assert!(html.contains("let x = **y**;\nlet z = `w`;\n"));
        assert!(!html.contains("<strong>"));
        assert!(!html.contains("<br>"));
    }

    #[test]
    fn test_data_code_attribute_holds_escaped_code() {
        let code = "if a < b && c > \"d\" { 'e' }\n";
        let html = format(&format!("```rust\n{code}```"));

        let start = html.find("data-code=\"").unwrap() + "data-code=\"".len();
        let end = start + html[start..].find('"').unwrap();
        assert_eq!(&html[start..end], escape_html(code));
    }

    #[test]
    fn test_inline_code_is_escaped_and_protected() {
        let html = format("use `<T>` not `**x**`");
        assert_eq!(
            html,
            "use <code class=\"inline-code\">&lt;T&gt;</code> not <code class=\"inline-code\">**x**</code>"
        );
    }

    #[test]
    fn test_plain_text_markup_is_escaped() {
        assert_eq!(
            format("<img src=x onerror=alert(1)>"),
            "&lt;img src=x onerror=alert(1)&gt;"
        );
    }

    #[test]
    fn test_text_around_code_block_is_formatted() {
        let html = format("**Example**\n```\ncode\n```\ndone");
        assert!(html.starts_with("<strong>Example</strong><br><div class=\"code-block\">"));
        assert!(html.ends_with("</div><br>done"));
    }

    #[test]
    fn test_code_blocks_extraction() {
        let blocks = code_blocks("a\n```py\nprint(1)\n```\nb\n```\nraw\n```");
        assert_eq!(
            blocks,
            vec![
                CodeBlock {
                    language: Some("py".to_string()),
                    code: "print(1)\n".to_string(),
                },
                CodeBlock {
                    language: None,
                    code: "raw\n".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_escape_all_significant_characters() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_stray_backticks_around_code_block() {
        let html = format("It's a ` tick\n```\ncode\n```\nanother ` tick");
        assert!(!html.contains('\0'));
        assert!(html.contains("<div class=\"code-block\"><pre><code>code\n</code></pre>"));
        assert!(!html.contains("inline-code"));
        assert!(html.starts_with("It&#39;s a ` tick<br>"));
        assert!(html.ends_with("</div><br>another ` tick"));
    }

    #[test]
    fn test_inline_code_beside_code_block() {
        let html = format("run `a`\n```\nb\n```\nthen `c`");
        assert!(html.starts_with("run <code class=\"inline-code\">a</code><br><div"));
        assert!(html.ends_with("</div><br>then <code class=\"inline-code\">c</code>"));
    }
}
