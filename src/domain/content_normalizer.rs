//! 正文规范化
//!
//! 把章节正文 HTML 片段转换为有序的段落序列：
//! - 只提取最外层的 `p` / `pre` / `blockquote`
//! - 带 `dir` 属性的元素：每个内层 `span` 成为独立的 `<p>` 段落，外层元素丢弃
//! - 普通元素：去掉所有 `span` 包装，`pre` 改写为 `p`
//! - 段落内只保留行内元素，`script` / `style` 等整体丢弃
//!
//! 输出再次输入时结果不变。

use scraper::{ElementRef, Html};

use super::title::Paragraph;

/// 被提取的块级元素
const BLOCK_TAGS: &[&str] = &["p", "pre", "blockquote"];

/// 段落上下文中保留的行内元素，其余元素只保留子节点
const PHRASING_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "big", "br", "cite", "code", "data", "del", "dfn", "em",
    "font", "i", "img", "ins", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small",
    "strike", "strong", "sub", "sup", "time", "tt", "u", "var", "wbr",
];

/// 内容不是普通文本节点的元素，连同内容一起丢弃
const DROPPED_TAGS: &[&str] = &[
    "iframe", "math", "noembed", "noframes", "noscript", "plaintext", "script", "style", "svg",
    "template", "textarea", "title", "xmp",
];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// 规范化章节正文
pub fn normalize_content(html: &str) -> Vec<Paragraph> {
    let fragment = Html::parse_fragment(html);

    let mut blocks = Vec::new();
    collect_blocks(fragment.root_element(), &mut blocks);

    let mut paragraphs = Vec::new();
    for block in blocks {
        let spans = if block.value().attr("dir").is_some() {
            let mut spans = Vec::new();
            collect_outer(block, &["span"], &mut spans);
            spans
        } else {
            Vec::new()
        };

        if spans.is_empty() {
            let mut markup = String::new();
            render_element(block, false, &mut markup);
            paragraphs.push(Paragraph::new(markup));
        } else {
            for span in spans {
                let mut markup = String::from("<p>");
                render_children(span, true, &mut markup);
                markup.push_str("</p>");
                paragraphs.push(Paragraph::new(markup));
            }
        }
    }

    paragraphs
}

fn collect_blocks<'a>(element: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
    collect_outer(element, BLOCK_TAGS, out);
}

/// 收集最外层的指定标签元素（不进入已命中元素的子树）
fn collect_outer<'a>(element: ElementRef<'a>, tags: &[&str], out: &mut Vec<ElementRef<'a>>) {
    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            if tags.contains(&child.value().name()) {
                out.push(child);
            } else {
                collect_outer(child, tags, out);
            }
        }
    }
}

fn render_element(element: ElementRef<'_>, in_paragraph: bool, out: &mut String) {
    let name = element.value().name();

    if DROPPED_TAGS.contains(&name) {
        return;
    }

    if name == "span" || (in_paragraph && !PHRASING_TAGS.contains(&name)) {
        render_children(element, in_paragraph, out);
        return;
    }

    let name = if name == "pre" { "p" } else { name };

    out.push('<');
    out.push_str(name);
    for (key, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&name) {
        return;
    }

    render_children(element, in_paragraph || name == "p", out);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn render_children(element: ElementRef<'_>, in_paragraph: bool, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            render_element(child_element, in_paragraph, out);
        } else if let Some(text) = child.value().as_text() {
            escape_text(text, out);
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
