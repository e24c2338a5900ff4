use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use std::fmt::Write;

use super::layout::{Block, Document, Page, BRAND};
use crate::progress::ProgressBar;

/// Link schemes allowed into the rendered document
const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

const STYLE: &str = r#"
  @page { size: letter; margin: 0.75in; }
  body { font-family: "Inter", "Helvetica Neue", Arial, sans-serif; color: #1f2937; }
  .page { page-break-after: always; min-height: 9in; position: relative; }
  .page:last-child { page-break-after: auto; }
  h1 { color: #f97316; font-size: 28pt; }
  h2 { color: #0f172a; border-bottom: 2px solid #f97316; padding-bottom: 4px; }
  code { font-size: 14pt; }
  footer { position: absolute; bottom: 0; font-size: 9pt; color: #6b7280; }
"#;

/// Markdown for one page
pub fn page_markdown(page: &Page) -> String {
    let mut out = String::new();
    for block in &page.blocks {
        write_block(&mut out, block);
        out.push('\n');
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Title(text) => {
            let _ = writeln!(out, "# {}", single_line(text));
        }
        Block::Heading(text) => {
            let _ = writeln!(out, "## {}", single_line(text));
        }
        Block::Paragraph(text) => {
            let _ = writeln!(out, "{}", text.trim());
        }
        Block::Facts(rows) => {
            for (label, value) in rows {
                let _ = writeln!(out, "- **{}:** {}", single_line(label), single_line(value));
            }
        }
        Block::Bullets(items) => {
            for item in items {
                let _ = writeln!(out, "- {}", single_line(item));
            }
        }
        Block::Steps(items) => {
            for (i, item) in items.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, single_line(item));
            }
        }
        Block::Score { score, verdict } => {
            let bar = ProgressBar::new(*score as u64, 100).with_width(20);
            let _ = writeln!(out, "**Viability score: {} / 100** ({})", score, single_line(verdict));
            let _ = writeln!(out);
            let _ = writeln!(out, "`{}`", bar);
        }
        Block::Resources(resources) => {
            for resource in resources {
                let name = single_line(&resource.name);
                match resource.url.as_deref().map(|raw| (raw, resource_destination(raw))) {
                    Some((_, Some(url))) => {
                        let _ = write!(out, "- [{}](<{}>)", name, url);
                    }
                    Some((raw, None)) => {
                        log::warn!("Dropping unsafe link for resource {:?}: {:?}", name, raw);
                        let _ = write!(out, "- **{}**", name);
                    }
                    None => {
                        let _ = write!(out, "- **{}**", name);
                    }
                }
                if let Some(description) = resource.description.as_deref() {
                    let _ = write!(out, ": {}", single_line(description));
                }
                out.push('\n');
            }
        }
    }
}

/// Collapse newlines so user text cannot break out of a list item or heading
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse `raw` and keep it only for an allowed scheme
fn safe_url(raw: &str) -> Option<url::Url> {
    let url = url::Url::parse(raw.trim()).ok()?;
    SAFE_SCHEMES.contains(&url.scheme()).then_some(url)
}

/// Normalized URL usable inside a `<...>` link destination
fn resource_destination(raw: &str) -> Option<String> {
    let url = safe_url(raw)?;
    let url = url.as_str();
    (!url.contains(['<', '>'])).then(|| url.to_string())
}

fn is_safe_link(tag: &Tag) -> bool {
    match tag {
        Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => safe_url(dest_url).is_some(),
        _ => true,
    }
}

/// Markdown to HTML. Raw HTML in user text is rendered as literal text, and
/// links or images with a disallowed scheme keep only their text.
fn markdown_to_html(markdown: &str) -> String {
    // One entry per open link or image: whether its tags are emitted
    let mut open_links: Vec<bool> = Vec::new();
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH).filter_map(move |event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
            let keep = is_safe_link(&tag);
            open_links.push(keep);
            keep.then_some(Event::Start(tag))
        }
        Event::End(end @ (TagEnd::Link | TagEnd::Image)) => {
            open_links.pop().unwrap_or(true).then_some(Event::End(end))
        }
        other => Some(other),
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Printable, branded HTML: one `<section class="page">` per page
pub fn render_html(document: &Document) -> String {
    let mut body = String::new();
    for (index, page) in document.pages.iter().enumerate() {
        let _ = write!(
            body,
            "<section class=\"page\">\n{}<footer>{}</footer>\n</section>\n",
            markdown_to_html(&page_markdown(page)),
            escape_text(&document.footer(index))
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} | {}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_text(&document.title),
        BRAND,
        STYLE,
        body
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
