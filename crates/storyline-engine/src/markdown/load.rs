//! Loading Markdown into the block model.
//!
//! The block model is flatter than CommonMark: nested lists are flattened into
//! their outer list, a blockquote is one inline run, and code inside a list
//! item or quote becomes plain text of that leaf.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::editing::document::{
    Block, Document, HeadingLevel, Inline, ListItem, ListKind, plain_text,
};
use crate::editing::inline;

impl Document {
    /// Parse Markdown into a document. Blank input gives an empty paragraph.
    pub fn from_markdown(markdown: &str) -> Self {
        let mut loader = Loader::default();
        for event in Parser::new(markdown) {
            loader.process_event(event);
        }
        Document::from_blocks(loader.finalize())
    }
}

/// Open inline container awaiting its end event
enum Frame {
    Strong,
    Emphasis,
    Link(String),
}

/// Builds an inline tree from start/end events
#[derive(Default)]
struct InlineBuilder {
    root: Vec<Inline>,
    open: Vec<(Frame, Vec<Inline>)>,
}

impl InlineBuilder {
    fn target(&mut self) -> &mut Vec<Inline> {
        match self.open.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: &str) {
        let target = self.target();
        match target.last_mut() {
            Some(Inline::Text(last)) => last.push_str(text),
            _ => target.push(Inline::text(text)),
        }
    }

    fn push(&mut self, inline: Inline) {
        self.target().push(inline);
    }

    fn open(&mut self, frame: Frame) {
        self.open.push((frame, Vec::new()));
    }

    fn close(&mut self) {
        let Some((frame, children)) = self.open.pop() else {
            return;
        };
        let inline = match frame {
            Frame::Strong => Inline::Bold(children),
            Frame::Emphasis => Inline::Italic(children),
            Frame::Link(href) => Inline::Link {
                href,
                text: plain_text(&children),
            },
        };
        self.push(inline);
    }

    fn is_empty(&self) -> bool {
        self.open.is_empty() && plain_text(&self.root).is_empty()
    }

    /// Take the finished run in canonical form, closing anything left open
    fn take(&mut self) -> Vec<Inline> {
        while !self.open.is_empty() {
            self.close();
        }
        let root = std::mem::take(&mut self.root);
        inline::from_runs(inline::to_runs(&root))
    }
}

/// Tracks block-level state while walking the event stream
#[derive(Default)]
struct Loader {
    blocks: Vec<Block>,
    inlines: InlineBuilder,
    heading: Option<HeadingLevel>,
    quote_depth: usize,
    /// Open list and how deeply lists are nested
    list: Option<(ListKind, Vec<ListItem>)>,
    list_depth: usize,
    item_open: bool,
    code: Option<String>,
}

impl Loader {
    fn in_container(&self) -> bool {
        self.quote_depth > 0 || self.item_open
    }

    /// Separate the content of consecutive paragraphs folded into one leaf
    fn separate(&mut self) {
        if !self.inlines.is_empty() {
            self.inlines.push_text(" ");
        }
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::Paragraph) | Event::Start(Tag::HtmlBlock) => {
                if self.in_container() {
                    self.separate();
                }
            }
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::HtmlBlock) => {
                if !self.in_container() {
                    self.flush_paragraph();
                }
            }
            // A heading inside a quote or list item becomes text of that leaf
            Event::Start(Tag::Heading { level, .. }) => {
                if self.in_container() {
                    self.separate();
                } else {
                    self.heading = HeadingLevel::from_depth(level as usize);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if !self.in_container() {
                    let content = self.inlines.take();
                    let level = self.heading.take().unwrap_or(HeadingLevel::H1);
                    self.blocks.push(Block::heading(level, content));
                }
            }
            Event::Start(Tag::BlockQuote { .. }) => {
                if self.quote_depth == 0 && !self.item_open {
                    self.flush_paragraph();
                }
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote { .. }) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 && !self.item_open {
                    let content = self.inlines.take();
                    self.blocks.push(Block::quote(content));
                }
            }
            Event::Start(Tag::List(first)) => {
                if self.list_depth == 0 {
                    let kind = match first {
                        Some(_) => ListKind::Ordered,
                        None => ListKind::Unordered,
                    };
                    self.list = Some((kind, Vec::new()));
                }
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0
                    && let Some((kind, items)) = self.list.take()
                    && !items.is_empty()
                {
                    self.blocks.push(Block::list(kind, items));
                }
            }
            Event::Start(Tag::Item) => {
                // A nested item ends the text of its parent
                if self.item_open {
                    self.flush_item();
                }
                self.item_open = true;
            }
            Event::End(TagEnd::Item) => {
                if self.item_open {
                    self.flush_item();
                    self.item_open = false;
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                if self.in_container() {
                    self.separate();
                }
                self.code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = self.code.take().unwrap_or_default();
                let code = code.strip_suffix('\n').unwrap_or(&code);
                if self.in_container() {
                    self.inlines.push_text(code);
                } else {
                    self.blocks.push(Block::code_block(code));
                }
            }
            Event::Start(Tag::Strong) => self.inlines.open(Frame::Strong),
            Event::Start(Tag::Emphasis) => self.inlines.open(Frame::Emphasis),
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.inlines.open(Frame::Link(dest_url.to_string()))
            }
            Event::End(TagEnd::Strong) | Event::End(TagEnd::Emphasis) | Event::End(TagEnd::Link) => {
                self.inlines.close()
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                match self.code.as_mut() {
                    Some(code) => code.push_str(&text),
                    None => self.inlines.push_text(&text),
                }
            }
            Event::Code(code) => self.inlines.push(Inline::Code(code.to_string())),
            Event::SoftBreak => self.inlines.push_text(" "),
            Event::HardBreak => self.inlines.push_text("\n"),
            _ => {}
        }
    }

    fn flush_paragraph(&mut self) {
        if self.inlines.is_empty() {
            self.inlines.take();
            return;
        }
        let content = self.inlines.take();
        self.blocks.push(Block::paragraph(content));
    }

    fn flush_item(&mut self) {
        let content = self.inlines.take();
        if let Some((_, items)) = self.list.as_mut() {
            items.push(ListItem::new(content));
        }
    }

    fn finalize(mut self) -> Vec<Block> {
        self.flush_paragraph();
        self.blocks
    }
}
