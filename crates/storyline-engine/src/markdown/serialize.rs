use crate::editing::document::{BlockKind, Document, Inline, ListKind, plain_text};

/// Serialize the document to Markdown.
///
/// Headings, blockquotes and list items are written as plain text; only
/// paragraphs keep their inline formatting. The placeholder prompt and empty
/// paragraphs produce nothing, and the result is trimmed.
pub fn to_markdown(doc: &Document) -> String {
    let mut out = String::new();

    for block in doc.blocks() {
        match &block.kind {
            BlockKind::Placeholder(_) => {}
            // Whitespace-only paragraphs are skipped even when formatted
            BlockKind::Paragraph(content) if plain_text(content).trim().is_empty() => {}
            BlockKind::Paragraph(content) => {
                out.push_str(inline_markdown(content).trim());
                out.push_str("\n\n");
            }
            BlockKind::Heading { level, content } => {
                out.push_str(&format!("{} {}\n\n", level.marker(), plain_text(content)));
            }
            BlockKind::BlockQuote(content) => {
                out.push_str(&format!("> {}\n\n", plain_text(content)));
            }
            BlockKind::CodeBlock(code) => {
                out.push_str(&format!("```\n{code}\n```\n\n"));
            }
            BlockKind::List { kind, items } => {
                for (index, item) in items.iter().enumerate() {
                    let text = plain_text(&item.content);
                    match kind {
                        ListKind::Unordered => out.push_str(&format!("- {text}\n")),
                        ListKind::Ordered => out.push_str(&format!("{}. {text}\n", index + 1)),
                    }
                }
                out.push('\n');
            }
        }
    }

    out.trim().to_string()
}

/// Markdown for a run of inline nodes
pub fn inline_markdown(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        push_inline(inline, &mut out);
    }
    out
}

fn push_inline(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Text(text) => out.push_str(text),
        Inline::Bold(children) => {
            out.push_str("**");
            children.iter().for_each(|child| push_inline(child, out));
            out.push_str("**");
        }
        Inline::Italic(children) => {
            out.push('*');
            children.iter().for_each(|child| push_inline(child, out));
            out.push('*');
        }
        Inline::Code(code) => {
            out.push('`');
            out.push_str(code);
            out.push('`');
        }
        Inline::Link { href, text } => out.push_str(&format!("[{text}]({href})")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::document::{Block, HeadingLevel, ListItem};
    use pretty_assertions::assert_eq;

    fn items(texts: &[&str]) -> Vec<ListItem> {
        texts
            .iter()
            .map(|text| ListItem::new(vec![Inline::text(*text)]))
            .collect()
    }

    #[test]
    fn test_placeholder_only_serializes_empty() {
        let doc = Document::with_placeholder("Start writing your story...");
        assert_eq!(to_markdown(&doc), "");
    }

    #[test]
    fn test_empty_document_serializes_empty() {
        assert_eq!(to_markdown(&Document::new()), "");
    }

    #[test]
    fn test_formatted_whitespace_paragraph_is_skipped() {
        let doc = Document::from_blocks(vec![
            Block::paragraph(vec![Inline::Bold(vec![Inline::text(" ")])]),
            Block::paragraph(vec![Inline::text("kept")]),
        ]);
        assert_eq!(to_markdown(&doc), "kept");
    }

    #[test]
    fn test_ordered_list_is_renumbered() {
        let doc = Document::from_blocks(vec![Block::list(
            ListKind::Ordered,
            items(&["a", "b", "c"]),
        )]);
        assert_eq!(to_markdown(&doc), "1. a\n2. b\n3. c");
    }

    #[test]
    fn test_every_block_kind() {
        let doc = Document::from_blocks(vec![
            Block::heading(HeadingLevel::H1, vec![Inline::text("Title")]),
            Block::paragraph(vec![
                Inline::text("Some "),
                Inline::Bold(vec![Inline::text("bold")]),
                Inline::text(", "),
                Inline::Italic(vec![Inline::text("italic")]),
                Inline::text(" and "),
                Inline::Code("code".into()),
                Inline::text(" with a "),
                Inline::Link {
                    href: "https://example.com".into(),
                    text: "link".into(),
                },
            ]),
            Block::paragraph(Vec::new()),
            Block::quote(vec![Inline::text("Quoted")]),
            Block::code_block("fn main() {}"),
            Block::list(ListKind::Unordered, items(&["one", "two"])),
            Block::heading(HeadingLevel::H3, vec![Inline::text("End")]),
        ]);

        insta::assert_snapshot!(to_markdown(&doc), @r"
        # Title

        Some **bold**, *italic* and `code` with a [link](https://example.com)

        > Quoted

        ```
        fn main() {}
        ```

        - one
        - two

        ### End
        ");
    }

    #[test]
    fn test_headings_and_lists_drop_inline_formatting() {
        let doc = Document::from_blocks(vec![
            Block::heading(
                HeadingLevel::H2,
                vec![Inline::Bold(vec![Inline::text("Loud")])],
            ),
            Block::list(
                ListKind::Unordered,
                vec![ListItem::new(vec![Inline::Code("x".into())])],
            ),
        ]);
        assert_eq!(to_markdown(&doc), "## Loud\n\n- x");
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let doc = Document::from_blocks(vec![
            Block::paragraph(vec![Inline::text("  padded  ")]),
            Block::list(ListKind::Ordered, items(&["x"])),
        ]);
        let first = to_markdown(&doc);
        assert_eq!(to_markdown(&doc), first);
        assert_eq!(first, "padded\n\n1. x");
    }
}
