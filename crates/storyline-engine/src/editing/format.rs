use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::document::{
    Block, BlockId, BlockKind, Conversion, Document, HeadingLevel, LeafContentMut, ListKind,
    plain_text,
};
use super::inline::{self, Atom, Mark};
use super::patch::Patch;
use super::selection::{Position, Selection};
use crate::error::EditorError;
use crate::settings::EditorSettings;

/// Formatting commands delivered by the toolbar or keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatCommand {
    Bold,
    Italic,
    Code,
    Heading(HeadingLevel),
    List(ListKind),
    Quote,
    Link,
    CodeBlock,
}

impl FormatCommand {
    /// Wire name used by the command channel
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Code => "code",
            FormatCommand::Heading(HeadingLevel::H1) => "h1",
            FormatCommand::Heading(HeadingLevel::H2) => "h2",
            FormatCommand::Heading(HeadingLevel::H3) => "h3",
            FormatCommand::List(ListKind::Unordered) => "ul",
            FormatCommand::List(ListKind::Ordered) => "ol",
            FormatCommand::Quote => "quote",
            FormatCommand::Link => "link",
            FormatCommand::CodeBlock => "codeblock",
        }
    }
}

impl FromStr for FormatCommand {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s {
            "bold" => FormatCommand::Bold,
            "italic" => FormatCommand::Italic,
            "code" => FormatCommand::Code,
            "h1" => FormatCommand::Heading(HeadingLevel::H1),
            "h2" => FormatCommand::Heading(HeadingLevel::H2),
            "h3" => FormatCommand::Heading(HeadingLevel::H3),
            "ul" => FormatCommand::List(ListKind::Unordered),
            "ol" => FormatCommand::List(ListKind::Ordered),
            "quote" => FormatCommand::Quote,
            "link" => FormatCommand::Link,
            "codeblock" => FormatCommand::CodeBlock,
            other => return Err(EditorError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

impl TryFrom<String> for FormatCommand {
    type Error = EditorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormatCommand> for String {
    fn from(command: FormatCommand) -> Self {
        command.as_str().to_string()
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asks the user for a value. `None` means the prompt was cancelled.
pub trait Prompter {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

impl Document {
    /// Apply a formatting command to the selection.
    ///
    /// Every failure mode is a silent no-op returning `None`: no active
    /// selection, a block kind the command does not support, a cancelled prompt.
    pub fn format(
        &mut self,
        command: FormatCommand,
        selection: Option<&Selection>,
        prompter: &mut dyn Prompter,
        settings: &EditorSettings,
    ) -> Option<Patch> {
        let Some(selection) = selection else {
            log::debug!("ignoring `{command}`: no active selection");
            return None;
        };

        let patch = if self.placeholder {
            // The placeholder stands for an empty paragraph; format that instead
            self.transaction(|doc| {
                let leaf = doc.clear_placeholder();
                doc.apply_format(command, &Selection::caret(leaf, 0), prompter, settings)
            })
        } else {
            self.apply_format(command, selection, prompter, settings)
        };
        if patch.is_none() {
            log::debug!("`{command}` left the document unchanged");
        }
        patch
    }

    fn apply_format(
        &mut self,
        command: FormatCommand,
        selection: &Selection,
        prompter: &mut dyn Prompter,
        settings: &EditorSettings,
    ) -> Option<Patch> {
        match command {
            FormatCommand::Bold => self.toggle_mark(selection, Mark::Bold),
            FormatCommand::Italic => self.toggle_mark(selection, Mark::Italic),
            FormatCommand::Code => self.wrap_code(selection),
            FormatCommand::Heading(level) => self.convert(selection, Conversion::Heading(level)),
            FormatCommand::List(kind) => self.convert(selection, Conversion::List(kind)),
            FormatCommand::Quote => self.convert(selection, Conversion::Quote),
            FormatCommand::Link => self.create_link(selection, prompter, settings),
            FormatCommand::CodeBlock => self.insert_code_block(selection, settings),
        }
    }

    fn toggle_mark(&mut self, selection: &Selection, mark: Mark) -> Option<Patch> {
        if selection.is_collapsed() {
            return None;
        }
        let (start, end) = selection.ordered(self)?;
        let ranges = self.inline_ranges(start, end);
        if ranges.is_empty() {
            return None;
        }

        // Remove the mark only when all of the selection already has it
        let on = !ranges.iter().all(|(leaf, range)| {
            self.inline_content(*leaf)
                .is_some_and(|content| inline::covered(content, range.clone(), mark))
        });

        self.transaction(|doc| {
            let mut changed = Vec::new();
            for (leaf, range) in &ranges {
                let Some(LeafContentMut::Inline(content)) = doc.leaf_mut(*leaf) else {
                    continue;
                };
                *content = inline::set_mark(content, range.clone(), mark, on);
                let block = doc.enclosing_block(*leaf)?.id;
                if !changed.contains(&block) {
                    changed.push(block);
                }
            }
            let selection = selection.clamped(doc)?;
            Some(doc.patch(changed, selection))
        })
    }

    fn wrap_code(&mut self, selection: &Selection) -> Option<Patch> {
        let leaf = selection.single_leaf()?;
        let (start, end) = selection.ordered(self)?;
        if start.offset == end.offset {
            return None;
        }
        self.transaction(|doc| {
            let LeafContentMut::Inline(content) = doc.leaf_mut(leaf)? else {
                return None;
            };
            *content = inline::wrap_range(content, start.offset..end.offset, Atom::Code)?;
            let block = doc.enclosing_block(leaf)?.id;
            Some(doc.patch(vec![block], Selection::caret(leaf, end.offset)))
        })
    }

    /// Rewrite the block holding the selection. Headings accept paragraphs and
    /// headings; lists and quotes accept paragraphs only.
    fn convert(&mut self, selection: &Selection, conversion: Conversion) -> Option<Patch> {
        let leaf = selection.single_leaf()?;
        let location = self.locate(leaf)?;
        if location.item.is_some() {
            return None;
        }
        let content = match (&self.blocks[location.block].kind, conversion) {
            (BlockKind::Paragraph(content), _) => content.clone(),
            (BlockKind::Heading { content, .. }, Conversion::Heading(_)) => content.clone(),
            _ => return None,
        };
        Some(self.rewrite_block(location.block, conversion, content))
    }

    fn create_link(
        &mut self,
        selection: &Selection,
        prompter: &mut dyn Prompter,
        settings: &EditorSettings,
    ) -> Option<Patch> {
        let leaf = selection.single_leaf()?;
        let (start, end) = selection.ordered(self)?;
        self.inline_content(leaf)?;

        let url = prompter.prompt("Enter URL:", &settings.link_default)?;
        let url = url.trim();
        if url.is_empty() || url == settings.link_default {
            return None;
        }
        let atom = Atom::Link(url.to_string());

        if start.offset < end.offset {
            return self.transaction(|doc| {
                let LeafContentMut::Inline(content) = doc.leaf_mut(leaf)? else {
                    return None;
                };
                *content = inline::wrap_range(content, start.offset..end.offset, atom)?;
                let block = doc.enclosing_block(leaf)?.id;
                Some(doc.patch(vec![block], Selection::caret(leaf, end.offset)))
            });
        }

        let text = prompter.prompt("Enter link text:", "")?;
        if text.is_empty() {
            return None;
        }
        self.transaction(|doc| {
            let LeafContentMut::Inline(content) = doc.leaf_mut(leaf)? else {
                return None;
            };
            let (edited, after) = inline::insert_atom(content, start.offset, &text, atom);
            *content = edited;
            let block = doc.enclosing_block(leaf)?.id;
            Some(doc.patch(vec![block], Selection::caret(leaf, after)))
        })
    }

    /// Insert a code block at the selection start. A paragraph is split around
    /// the caret; any other leaf gets the code block after its top-level block.
    fn insert_code_block(&mut self, selection: &Selection, settings: &EditorSettings) -> Option<Patch> {
        let (start, _) = selection.ordered(self)?;
        let location = self.locate(start.leaf)?;
        let text = settings.code_block_placeholder.clone();

        self.transaction(|doc| {
            let code = Block::code_block(text.as_str());
            let code_id = code.id;

            let changed = match (&doc.blocks[location.block].kind, location.item) {
                (BlockKind::Paragraph(content), None) => {
                    let head_id = doc.blocks[location.block].id;
                    let (head, tail) = inline::split(content, start.offset);
                    let mut changed = Vec::new();
                    let mut replacement = Vec::new();
                    if !plain_text(&head).is_empty() {
                        replacement.push(Block {
                            id: head_id,
                            kind: BlockKind::Paragraph(head),
                        });
                        changed.push(head_id);
                    }
                    replacement.push(code);
                    changed.push(code_id);
                    if !plain_text(&tail).is_empty() {
                        let after = Block::paragraph(tail);
                        changed.push(after.id);
                        replacement.push(after);
                    }
                    doc.splice_blocks(location.block, replacement);
                    changed
                }
                _ => {
                    doc.insert_block(location.block + 1, code);
                    vec![code_id]
                }
            };
            Some(doc.patch(changed, Selection::caret(code_id, text.len())))
        })
    }

    /// Per-leaf byte ranges covered by `start..end`, restricted to inline leaves
    fn inline_ranges(&self, start: Position, end: Position) -> Vec<(BlockId, Range<usize>)> {
        let leaves = self.leaves();
        let (Some(first), Some(last)) = (
            leaves.iter().position(|leaf| *leaf == start.leaf),
            leaves.iter().position(|leaf| *leaf == end.leaf),
        ) else {
            return Vec::new();
        };

        leaves[first..=last]
            .iter()
            .filter_map(|&leaf| {
                let len = plain_text(self.inline_content(leaf)?).len();
                let from = if leaf == start.leaf { start.offset } else { 0 };
                let to = if leaf == end.leaf { end.offset } else { len };
                (from < to).then_some((leaf, from..to))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::document::{Inline, ListItem};
    use crate::markdown::to_markdown;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Answers prompts from a queue, recording the questions asked
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: Vec<Option<String>>,
        asked: Vec<String>,
    }

    impl ScriptedPrompter {
        fn answering(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().rev().map(|a| a.map(str::to_string)).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
            self.asked.push(message.to_string());
            self.answers.pop().flatten()
        }
    }

    fn paragraph_doc(text: &str) -> (Document, BlockId) {
        let doc = Document::from_blocks(vec![Block::paragraph(vec![Inline::text(text)])]);
        let leaf = doc.first_leaf().unwrap();
        (doc, leaf)
    }

    fn run(doc: &mut Document, command: FormatCommand, selection: &Selection) -> Option<Patch> {
        doc.format(
            command,
            Some(selection),
            &mut ScriptedPrompter::default(),
            &EditorSettings::default(),
        )
    }

    #[rstest]
    #[case("bold", FormatCommand::Bold)]
    #[case("italic", FormatCommand::Italic)]
    #[case("code", FormatCommand::Code)]
    #[case("h1", FormatCommand::Heading(HeadingLevel::H1))]
    #[case("h2", FormatCommand::Heading(HeadingLevel::H2))]
    #[case("h3", FormatCommand::Heading(HeadingLevel::H3))]
    #[case("ul", FormatCommand::List(ListKind::Unordered))]
    #[case("ol", FormatCommand::List(ListKind::Ordered))]
    #[case("quote", FormatCommand::Quote)]
    #[case("link", FormatCommand::Link)]
    #[case("codeblock", FormatCommand::CodeBlock)]
    fn test_command_wire_names(#[case] wire: &str, #[case] command: FormatCommand) {
        assert_eq!(wire.parse::<FormatCommand>().unwrap(), command);
        assert_eq!(command.as_str(), wire);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = "strike".parse::<FormatCommand>().unwrap_err();
        assert!(matches!(err, EditorError::UnknownCommand(ref kind) if kind == "strike"));
    }

    #[test]
    fn test_no_selection_is_noop() {
        let (mut doc, _) = paragraph_doc("text");
        let before = doc.clone();
        let patch = doc.format(
            FormatCommand::Heading(HeadingLevel::H1),
            None,
            &mut ScriptedPrompter::default(),
            &EditorSettings::default(),
        );
        assert!(patch.is_none());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_bold_then_italic_nests_markers() {
        let (mut doc, leaf) = paragraph_doc("text");
        let all = Selection::within(leaf, 0, 4);
        run(&mut doc, FormatCommand::Bold, &all).unwrap();
        run(&mut doc, FormatCommand::Italic, &all).unwrap();
        assert_eq!(to_markdown(&doc), "***text***");
    }

    #[test]
    fn test_italic_then_bold_nests_markers_the_same_way() {
        let (mut doc, leaf) = paragraph_doc("text");
        let all = Selection::within(leaf, 0, 4);
        run(&mut doc, FormatCommand::Italic, &all).unwrap();
        run(&mut doc, FormatCommand::Bold, &all).unwrap();
        assert_eq!(to_markdown(&doc), "***text***");
    }

    #[test]
    fn test_bold_toggles_off() {
        let (mut doc, leaf) = paragraph_doc("a word here");
        let word = Selection::within(leaf, 2, 6);
        run(&mut doc, FormatCommand::Bold, &word).unwrap();
        assert_eq!(to_markdown(&doc), "a **word** here");
        run(&mut doc, FormatCommand::Bold, &word).unwrap();
        assert_eq!(to_markdown(&doc), "a word here");
    }

    #[test]
    fn test_bold_partially_bold_selection_applies() {
        let (mut doc, leaf) = paragraph_doc("abcd");
        run(&mut doc, FormatCommand::Bold, &Selection::within(leaf, 0, 2)).unwrap();
        run(&mut doc, FormatCommand::Bold, &Selection::within(leaf, 0, 4)).unwrap();
        assert_eq!(to_markdown(&doc), "**abcd**");
    }

    #[test]
    fn test_bold_spans_multiple_leaves() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph(vec![Inline::text("one two")]),
            Block::code_block("skip"),
            Block::paragraph(vec![Inline::text("three four")]),
        ]);
        let leaves = doc.leaves();
        let selection = Selection::new(Position::new(leaves[0], 4), Position::new(leaves[2], 5));
        run(&mut doc, FormatCommand::Bold, &selection).unwrap();
        assert_eq!(
            to_markdown(&doc),
            "one **two**\n\n```\nskip\n```\n\n**three** four"
        );
    }

    #[test]
    fn test_collapsed_bold_is_noop() {
        let (mut doc, leaf) = paragraph_doc("text");
        assert!(run(&mut doc, FormatCommand::Bold, &Selection::caret(leaf, 2)).is_none());
    }

    #[test]
    fn test_inline_code_wraps_selection() {
        let (mut doc, leaf) = paragraph_doc("call foo now");
        let patch = run(&mut doc, FormatCommand::Code, &Selection::within(leaf, 5, 8)).unwrap();
        assert_eq!(to_markdown(&doc), "call `foo` now");
        assert_eq!(patch.new_selection, Selection::caret(leaf, 8));
    }

    #[test]
    fn test_inline_code_with_empty_selection_is_noop() {
        let (mut doc, leaf) = paragraph_doc("call");
        assert!(run(&mut doc, FormatCommand::Code, &Selection::caret(leaf, 2)).is_none());
    }

    #[test]
    fn test_heading_preserves_inline_content() {
        let mut doc = Document::from_blocks(vec![Block::paragraph(vec![
            Inline::text("Big "),
            Inline::Bold(vec![Inline::text("news")]),
        ])]);
        let leaf = doc.first_leaf().unwrap();
        let patch = run(
            &mut doc,
            FormatCommand::Heading(HeadingLevel::H2),
            &Selection::caret(leaf, 1),
        )
        .unwrap();
        match &doc.blocks()[0].kind {
            BlockKind::Heading { level, content } => {
                assert_eq!(*level, HeadingLevel::H2);
                assert_eq!(content.len(), 2);
            }
            other => panic!("expected heading, got {other:?}"),
        }
        // Caret lands at the end of the new heading
        assert_eq!(patch.new_selection.focus.offset, 8);
        assert_eq!(to_markdown(&doc), "## Big news");
    }

    #[test]
    fn test_heading_relevels_existing_heading() {
        let mut doc = Document::from_blocks(vec![Block::heading(
            HeadingLevel::H1,
            vec![Inline::text("Title")],
        )]);
        let leaf = doc.first_leaf().unwrap();
        run(
            &mut doc,
            FormatCommand::Heading(HeadingLevel::H3),
            &Selection::caret(leaf, 0),
        )
        .unwrap();
        assert_eq!(to_markdown(&doc), "### Title");
    }

    #[test]
    fn test_heading_inside_list_item_is_noop() {
        let mut doc = Document::from_blocks(vec![Block::list(
            ListKind::Unordered,
            vec![ListItem::new(vec![Inline::text("item")])],
        )]);
        let leaf = doc.first_leaf().unwrap();
        let before = to_markdown(&doc);
        let patch = run(
            &mut doc,
            FormatCommand::Heading(HeadingLevel::H1),
            &Selection::caret(leaf, 2),
        );
        assert!(patch.is_none());
        assert_eq!(to_markdown(&doc), before);
    }

    #[test]
    fn test_list_and_quote_only_accept_paragraphs() {
        let mut doc = Document::from_blocks(vec![Block::heading(
            HeadingLevel::H1,
            vec![Inline::text("Title")],
        )]);
        let leaf = doc.first_leaf().unwrap();
        let caret = Selection::caret(leaf, 0);
        assert!(run(&mut doc, FormatCommand::List(ListKind::Ordered), &caret).is_none());
        assert!(run(&mut doc, FormatCommand::Quote, &caret).is_none());
    }

    #[test]
    fn test_paragraph_to_ordered_list() {
        let (mut doc, leaf) = paragraph_doc("first");
        let patch = run(
            &mut doc,
            FormatCommand::List(ListKind::Ordered),
            &Selection::caret(leaf, 0),
        )
        .unwrap();
        assert_eq!(to_markdown(&doc), "1. first");
        let item = patch.new_selection.focus.leaf;
        assert_eq!(doc.leaf_text(item).as_deref(), Some("first"));
        assert_eq!(patch.new_selection.focus.offset, 5);
    }

    #[test]
    fn test_paragraph_to_quote() {
        let (mut doc, leaf) = paragraph_doc("wise words");
        run(&mut doc, FormatCommand::Quote, &Selection::caret(leaf, 0)).unwrap();
        assert_eq!(to_markdown(&doc), "> wise words");
    }

    #[test]
    fn test_link_wraps_selected_text() {
        let (mut doc, leaf) = paragraph_doc("read the docs");
        let mut prompter = ScriptedPrompter::answering(&[Some("https://docs.rs")]);
        let patch = doc
            .format(
                FormatCommand::Link,
                Some(&Selection::within(leaf, 9, 13)),
                &mut prompter,
                &EditorSettings::default(),
            )
            .unwrap();
        assert_eq!(to_markdown(&doc), "read the [docs](https://docs.rs)");
        assert_eq!(prompter.asked, vec!["Enter URL:"]);
        assert_eq!(patch.new_selection, Selection::caret(leaf, 13));
    }

    #[test]
    fn test_link_without_selection_prompts_for_text() {
        let (mut doc, leaf) = paragraph_doc("see ");
        let mut prompter =
            ScriptedPrompter::answering(&[Some("https://example.com"), Some("here")]);
        doc.format(
            FormatCommand::Link,
            Some(&Selection::caret(leaf, 4)),
            &mut prompter,
            &EditorSettings::default(),
        )
        .unwrap();
        assert_eq!(to_markdown(&doc), "see [here](https://example.com)");
        assert_eq!(prompter.asked, vec!["Enter URL:", "Enter link text:"]);
    }

    #[rstest]
    #[case::cancelled_url(&[None])]
    #[case::default_url(&[Some("https://")])]
    #[case::blank_url(&[Some("  ")])]
    #[case::cancelled_text(&[Some("https://example.com"), None])]
    #[case::empty_text(&[Some("https://example.com"), Some("")])]
    fn test_link_prompt_cancellation_is_noop(#[case] answers: &[Option<&str>]) {
        let (mut doc, leaf) = paragraph_doc("text");
        let before = doc.clone();
        let mut prompter = ScriptedPrompter::answering(answers);
        let patch = doc.format(
            FormatCommand::Link,
            Some(&Selection::caret(leaf, 4)),
            &mut prompter,
            &EditorSettings::default(),
        );
        assert!(patch.is_none());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_link_inside_code_block_never_prompts() {
        let mut doc = Document::from_blocks(vec![Block::code_block("x")]);
        let leaf = doc.first_leaf().unwrap();
        let mut prompter = ScriptedPrompter::answering(&[Some("https://example.com")]);
        let patch = doc.format(
            FormatCommand::Link,
            Some(&Selection::caret(leaf, 1)),
            &mut prompter,
            &EditorSettings::default(),
        );
        assert!(patch.is_none());
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_codeblock_splits_paragraph_at_caret() {
        let (mut doc, leaf) = paragraph_doc("before after");
        let patch = run(&mut doc, FormatCommand::CodeBlock, &Selection::caret(leaf, 7)).unwrap();
        assert_eq!(
            to_markdown(&doc),
            "before\n\n```\nYour code here...\n```\n\nafter"
        );
        let code = patch.new_selection.focus.leaf;
        assert_eq!(doc.leaf_text(code).as_deref(), Some("Your code here..."));
        assert_eq!(patch.new_selection.focus.offset, "Your code here...".len());
        // The head keeps its block id
        assert_eq!(doc.blocks()[0].id, leaf);
    }

    #[test]
    fn test_codeblock_in_empty_paragraph_replaces_it() {
        let mut doc = Document::new();
        let leaf = doc.first_leaf().unwrap();
        run(&mut doc, FormatCommand::CodeBlock, &Selection::caret(leaf, 0)).unwrap();
        assert_eq!(doc.blocks().len(), 1);
        assert!(matches!(doc.blocks()[0].kind, BlockKind::CodeBlock(_)));
    }

    #[test]
    fn test_codeblock_after_list() {
        let mut doc = Document::from_blocks(vec![Block::list(
            ListKind::Unordered,
            vec![ListItem::new(vec![Inline::text("a")])],
        )]);
        let leaf = doc.first_leaf().unwrap();
        run(&mut doc, FormatCommand::CodeBlock, &Selection::caret(leaf, 1)).unwrap();
        assert_eq!(to_markdown(&doc), "- a\n\n```\nYour code here...\n```");
    }

    #[test]
    fn test_codeblock_on_placeholder_replaces_it() {
        let mut doc = Document::with_placeholder("Start writing your story...");
        let leaf = doc.first_leaf().unwrap();
        let patch = run(&mut doc, FormatCommand::CodeBlock, &Selection::caret(leaf, 27)).unwrap();

        assert!(!doc.is_placeholder());
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].id, patch.new_selection.focus.leaf);
        assert_eq!(to_markdown(&doc), "```\nYour code here...\n```");
    }

    #[test]
    fn test_bold_on_placeholder_keeps_it() {
        let mut doc = Document::with_placeholder("Start writing your story...");
        let leaf = doc.first_leaf().unwrap();
        let before = doc.clone();
        assert!(run(&mut doc, FormatCommand::Bold, &Selection::within(leaf, 0, 5)).is_none());
        assert_eq!(doc, before);
    }
}
