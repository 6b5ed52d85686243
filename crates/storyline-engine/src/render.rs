//! HTML display projection.
//!
//! The display tree is derived from the document on demand and never read
//! back; hosts that show the surface as HTML re-render it from each patch.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::editing::document::{Block, BlockId, BlockKind, Document, Inline, ListKind};

/// Renders a document as an HTML fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlRenderer {
    /// Emit `data-block-id` attributes so a host can map DOM nodes back to leaves
    pub block_ids: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self { block_ids: true }
    }
}

impl HtmlRenderer {
    pub fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        for block in doc.blocks() {
            self.push_block(block, &mut out);
        }
        out
    }

    fn push_block(&self, block: &Block, out: &mut String) {
        let id = self.id_attribute(block.id);
        match &block.kind {
            BlockKind::Paragraph(content) if content.is_empty() => {
                out.push_str(&format!("<p{id}><br></p>"));
            }
            BlockKind::Paragraph(content) => {
                out.push_str(&format!("<p{id}>{}</p>", inline_html(content)));
            }
            BlockKind::Placeholder(text) => {
                out.push_str(&format!(
                    "<p{id} class=\"placeholder\">{}</p>",
                    encode_text(text)
                ));
            }
            BlockKind::Heading { level, content } => {
                let tag = format!("h{}", level.depth());
                out.push_str(&format!("<{tag}{id}>{}</{tag}>", inline_html(content)));
            }
            BlockKind::BlockQuote(content) => {
                out.push_str(&format!("<blockquote{id}>{}</blockquote>", inline_html(content)));
            }
            BlockKind::CodeBlock(code) => {
                out.push_str(&format!("<pre{id}><code>{}</code></pre>", encode_text(code)));
            }
            BlockKind::List { kind, items } => {
                let tag = match kind {
                    ListKind::Unordered => "ul",
                    ListKind::Ordered => "ol",
                };
                out.push_str(&format!("<{tag}{id}>"));
                for item in items {
                    out.push_str(&format!(
                        "<li{}>{}</li>",
                        self.id_attribute(item.id),
                        inline_html(&item.content)
                    ));
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }

    fn id_attribute(&self, id: BlockId) -> String {
        if self.block_ids {
            format!(" data-block-id=\"{id}\"")
        } else {
            String::new()
        }
    }
}

fn inline_html(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&encode_text(text)),
            Inline::Bold(children) => out.push_str(&format!("<strong>{}</strong>", inline_html(children))),
            Inline::Italic(children) => out.push_str(&format!("<em>{}</em>", inline_html(children))),
            Inline::Code(code) => out.push_str(&format!("<code>{}</code>", encode_text(code))),
            Inline::Link { href, text } => out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                encode_double_quoted_attribute(href),
                encode_text(text)
            )),
        }
    }
    out
}

/// Render with block ids
pub fn to_html(doc: &Document) -> String {
    HtmlRenderer::default().render(doc)
}
