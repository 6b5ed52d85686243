use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use storyline_engine::editing::{
    BlockId, BlockKind, Document, Inline, ListKind, Position, Selection,
};

/// A question shown in the input bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    pub input: String,
}

/// Everything the terminal shows. The document pane is rebuilt from the
/// surface after each event; the preview and status come from the sinks.
#[derive(Debug, Default)]
pub struct View {
    pub title: String,
    pub lines: Vec<Line<'static>>,
    /// Caret as (column, row) in document pane coordinates
    pub cursor: Option<(usize, usize)>,
    pub selection: Option<Selection>,
    pub preview: String,
    pub status: String,
    pub syncs: usize,
    pub prompt: Option<Prompt>,
    pub notice: Option<String>,
}

impl View {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn show_document(&mut self, doc: &Document) {
        let layout = DocumentLayout::build(doc, self.selection);
        self.lines = layout.lines;
        self.cursor = layout.cursor;
    }
}

/// Styled lines for a document plus the caret location
#[derive(Debug, Default)]
pub struct DocumentLayout {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<(usize, usize)>,
}

impl DocumentLayout {
    pub fn build(doc: &Document, selection: Option<Selection>) -> Self {
        let mut builder = LayoutBuilder {
            doc,
            ordered: selection.and_then(|s| s.ordered(doc)),
            focus: selection.map(|s| s.focus),
            lines: Vec::new(),
            current: Vec::new(),
            indent: 0,
            cursor: None,
        };
        for block in doc.blocks() {
            match &block.kind {
                BlockKind::Paragraph(content) => {
                    builder.inline_leaf(block.id, "", Style::default(), content)
                }
                BlockKind::Placeholder(text) => builder.text_leaf(
                    block.id,
                    "",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                    text,
                ),
                BlockKind::Heading { level, content } => builder.inline_leaf(
                    block.id,
                    &format!("{} ", level.marker()),
                    Style::default().add_modifier(Modifier::BOLD),
                    content,
                ),
                BlockKind::BlockQuote(content) => builder.inline_leaf(
                    block.id,
                    "│ ",
                    Style::default().fg(Color::Gray),
                    content,
                ),
                BlockKind::CodeBlock(code) => {
                    builder.text_leaf(block.id, "  ", Style::default().fg(Color::Yellow), code)
                }
                BlockKind::List { kind, items } => {
                    for (index, item) in items.iter().enumerate() {
                        let marker = match kind {
                            ListKind::Unordered => "• ".to_string(),
                            ListKind::Ordered => format!("{}. ", index + 1),
                        };
                        builder.inline_leaf(item.id, &marker, Style::default(), &item.content);
                    }
                }
            }
            builder.lines.push(Line::default());
        }
        builder.lines.pop();

        Self {
            lines: builder.lines,
            cursor: builder.cursor,
        }
    }
}

struct LayoutBuilder<'a> {
    doc: &'a Document,
    ordered: Option<(Position, Position)>,
    focus: Option<Position>,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// Width of the current leaf's prefix; continuation rows are indented by it
    indent: usize,
    cursor: Option<(usize, usize)>,
}

impl LayoutBuilder<'_> {
    /// Byte range of `leaf` covered by a non-empty selection
    fn selected_range(&self, leaf: BlockId) -> Option<Range<usize>> {
        let (start, end) = self.ordered?;
        if start == end {
            return None;
        }
        let index = self.doc.leaf_index(leaf)?;
        let first = self.doc.leaf_index(start.leaf)?;
        let last = self.doc.leaf_index(end.leaf)?;
        if index < first || index > last {
            return None;
        }
        let from = if index == first { start.offset } else { 0 };
        let to = if index == last { end.offset } else { usize::MAX };
        Some(from..to)
    }

    fn inline_leaf(&mut self, leaf: BlockId, prefix: &str, base: Style, content: &[Inline]) {
        let row = self.begin_leaf(prefix);
        let selected = self.selected_range(leaf);
        let mut offset = 0;
        for inline in content {
            self.push_inline(inline, base, &selected, &mut offset);
        }
        self.end_leaf(leaf, row);
    }

    fn text_leaf(&mut self, leaf: BlockId, prefix: &str, style: Style, text: &str) {
        let row = self.begin_leaf(prefix);
        let selected = self.selected_range(leaf);
        self.push_text(text, 0, style, &selected);
        self.end_leaf(leaf, row);
    }

    fn begin_leaf(&mut self, prefix: &str) -> usize {
        self.indent = prefix.chars().count();
        self.current.push(Span::styled(
            prefix.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
        self.lines.len()
    }

    fn end_leaf(&mut self, leaf: BlockId, row: usize) {
        let current = std::mem::take(&mut self.current);
        self.lines.push(Line::from(current));

        if let Some(focus) = self.focus.filter(|focus| focus.leaf == leaf)
            && let Some(text) = self.doc.leaf_text(leaf)
        {
            let before = &text[..floor_boundary(&text, focus.offset)];
            let rows = before.matches('\n').count();
            let column = before.rsplit('\n').next().unwrap_or("").chars().count();
            self.cursor = Some((self.indent + column, row + rows));
        }
    }

    fn push_inline(
        &mut self,
        inline: &Inline,
        style: Style,
        selected: &Option<Range<usize>>,
        offset: &mut usize,
    ) {
        let (text, style) = match inline {
            Inline::Bold(children) | Inline::Italic(children) => {
                let modifier = match inline {
                    Inline::Bold(_) => Modifier::BOLD,
                    _ => Modifier::ITALIC,
                };
                for child in children {
                    self.push_inline(child, style.add_modifier(modifier), selected, offset);
                }
                return;
            }
            Inline::Text(text) => (text, style),
            Inline::Code(code) => (code, style.fg(Color::Yellow)),
            Inline::Link { text, .. } => (
                text,
                style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        };
        self.push_text(text, *offset, style, selected);
        *offset += text.len();
    }

    /// Push text starting at byte `offset` of its leaf, breaking lines on `\n`
    /// and reversing the selected part
    fn push_text(
        &mut self,
        text: &str,
        offset: usize,
        style: Style,
        selected: &Option<Range<usize>>,
    ) {
        let mut start = offset;
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                let current = std::mem::take(&mut self.current);
                self.lines.push(Line::from(current));
                self.current.push(Span::raw(" ".repeat(self.indent)));
                start += 1;
            }
            self.push_piece(piece, start, style, selected);
            start += piece.len();
        }
    }

    fn push_piece(&mut self, piece: &str, start: usize, style: Style, selected: &Option<Range<usize>>) {
        if piece.is_empty() {
            return;
        }
        let end = start + piece.len();
        let Some(range) = selected.as_ref().filter(|r| r.start < end && r.end > start) else {
            self.current.push(Span::styled(piece.to_string(), style));
            return;
        };
        let from = range.start.max(start) - start;
        let to = range.end.min(end) - start;
        let (from, to) = (floor_boundary(piece, from), floor_boundary(piece, to));
        let reversed = style.add_modifier(Modifier::REVERSED);
        for (part, part_style) in [
            (&piece[..from], style),
            (&piece[from..to], reversed),
            (&piece[to..], style),
        ] {
            if !part.is_empty() {
                self.current.push(Span::styled(part.to_string(), part_style));
            }
        }
    }
}

fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

const HELP: &str = "Esc: save & quit | ^S: save | ^B/^I/^K: bold/italic/link | F1-F3: h1-h3 | F4/F5: ul/ol | F6: quote | F7: code | F8: code block";

pub fn ui(f: &mut Frame, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(rows[0]);

    // Document pane, scrolled so the caret stays visible
    let inner_height = panes[0].height.saturating_sub(2) as usize;
    let scroll = match view.cursor {
        Some((_, row)) if row >= inner_height => row + 1 - inner_height,
        _ => 0,
    };
    let document = Paragraph::new(view.lines.clone())
        .block(Block::default().borders(Borders::ALL).title(view.title.clone()))
        .scroll((scroll as u16, 0));
    f.render_widget(document, panes[0]);

    let preview = Paragraph::new(view.preview.clone())
        .block(Block::default().borders(Borders::ALL).title("Markdown"))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, panes[1]);

    let status = Line::from(vec![
        Span::styled(view.status.clone(), Style::default().fg(Color::Cyan)),
        Span::raw(format!("  syncs: {}", view.syncs)),
        Span::raw(
            view.notice
                .as_ref()
                .map(|notice| format!("  {notice}"))
                .unwrap_or_default(),
        ),
    ]);
    f.render_widget(Paragraph::new(status), rows[1]);

    match &view.prompt {
        Some(prompt) => {
            let text = format!("{} {}", prompt.message, prompt.input);
            let width = text.chars().count() as u16;
            f.render_widget(
                Paragraph::new(text).style(Style::default().add_modifier(Modifier::BOLD)),
                rows[2],
            );
            f.set_cursor_position((rows[2].x + width, rows[2].y));
        }
        None => {
            f.render_widget(
                Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
                rows[2],
            );
            if let Some((column, row)) = view.cursor
                && row >= scroll
                && row - scroll < inner_height
            {
                let x = panes[0].x + 1 + column as u16;
                let y = panes[0].y + 1 + (row - scroll) as u16;
                f.set_cursor_position((x, y));
            }
        }
    }
}
