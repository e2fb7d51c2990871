//! Markdown-subset renderer for remedy text
//!
//! Supports exactly: `#`/`##`/`###` headers, `**bold**`, `*italic*`, `-`/`*`
//! bullet items, `N.` numbered items and blank-line separated paragraphs.
//! Line prefixes take precedence over inline markers, which take precedence
//! over paragraph grouping. Lists do not nest and malformed markers pass
//! through as literal text.
//!
//! The source is HTML-escaped before any rule is applied, so the output only
//! ever contains the tags produced here.

use lazy_static::lazy_static;
use regex::Regex;

/// Rendered in place of empty or absent remedy text
pub const NO_INFORMATION_HTML: &str = "<p>No treatment information available.</p>";

lazy_static! {
    static ref HEADER_RE: Regex = Regex::new(r"^(#{1,3}) (.*)$").unwrap();
    static ref BULLET_RE: Regex = Regex::new(r"^[-*] (.*)$").unwrap();
    static ref NUMBERED_RE: Regex = Regex::new(r"^\d+\. (.*)$").unwrap();
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref ITALIC_RE: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Paragraph,
    Bullets,
    Numbered,
}

impl Block {
    fn open_tag(self) -> &'static str {
        match self {
            Block::Paragraph => "<p>",
            Block::Bullets => "<ul>",
            Block::Numbered => "<ol>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            Block::Paragraph => "</p>",
            Block::Bullets => "</ul>",
            Block::Numbered => "</ol>",
        }
    }
}

#[derive(Default)]
struct Builder {
    out: String,
    open: Option<Block>,
}

impl Builder {
    fn close(&mut self) {
        if let Some(block) = self.open.take() {
            self.out.push_str(block.close_tag());
            self.out.push('\n');
        }
    }

    fn standalone(&mut self, html: &str) {
        self.close();
        self.out.push_str(html);
        self.out.push('\n');
    }

    // Paragraph lines are joined by soft breaks; list items each get a line.
    fn push_into(&mut self, block: Block, html: &str) {
        let is_list = block != Block::Paragraph;
        if self.open != Some(block) {
            self.close();
            self.out.push_str(block.open_tag());
            if is_list {
                self.out.push('\n');
            }
            self.open = Some(block);
        } else if !is_list {
            self.out.push('\n');
        }
        self.out.push_str(html);
        if is_list {
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.close();
        self.out.trim_end().to_string()
    }
}

/// Render remedy text to markup
pub fn render(markdown: Option<&str>) -> String {
    let source = match markdown {
        Some(text) if !text.trim().is_empty() => text,
        _ => return NO_INFORMATION_HTML.to_string(),
    };

    let escaped = escape_html(source);
    let mut builder = Builder::default();

    for line in escaped.lines() {
        if line.trim().is_empty() {
            builder.close();
        } else if let Some(caps) = HEADER_RE.captures(line) {
            let level = caps[1].len();
            builder.standalone(&format!("<h{level}>{}</h{level}>", inline(&caps[2])));
        } else if let Some(caps) = BULLET_RE.captures(line) {
            builder.push_into(Block::Bullets, &format!("<li>{}</li>", inline(&caps[1])));
        } else if let Some(caps) = NUMBERED_RE.captures(line) {
            builder.push_into(Block::Numbered, &format!("<li>{}</li>", inline(&caps[1])));
        } else {
            builder.push_into(Block::Paragraph, &inline(line));
        }
    }

    builder.finish()
}

fn inline(text: &str) -> String {
    let bold = BOLD_RE.replace_all(text, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&bold, "<em>$1</em>").into_owned()
}

/// Escape the characters that are significant in HTML text and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
