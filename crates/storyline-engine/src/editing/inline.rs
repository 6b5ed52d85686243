//! Flat-run view of inline content.
//!
//! Inline edits (insertion, deletion, mark toggling, wrapping a range in code or
//! a link) are easier on a flat list of styled runs than on the nested
//! [`Inline`] tree. Every edit converts the tree to runs, edits the runs, and
//! rebuilds a canonical tree: bold outermost, then italic, then the atom.
//!
//! Offsets are byte offsets into the concatenated plain text and are clamped to
//! UTF-8 character boundaries.

use std::ops::Range;

use super::document::Inline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Marks {
    pub bold: bool,
    pub italic: bool,
}

impl Marks {
    fn has(self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
        }
    }

    fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Atom {
    Plain,
    Code,
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    pub text: String,
    pub marks: Marks,
    pub atom: Atom,
}

pub(crate) fn to_runs(inlines: &[Inline]) -> Vec<Run> {
    let mut runs = Vec::new();
    collect_runs(inlines, Marks::default(), &mut runs);
    runs
}

fn collect_runs(inlines: &[Inline], marks: Marks, out: &mut Vec<Run>) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => push_run(out, text, marks, Atom::Plain),
            Inline::Code(text) => push_run(out, text, marks, Atom::Code),
            Inline::Link { href, text } => push_run(out, text, marks, Atom::Link(href.clone())),
            Inline::Bold(children) => collect_runs(
                children,
                Marks {
                    bold: true,
                    ..marks
                },
                out,
            ),
            Inline::Italic(children) => collect_runs(
                children,
                Marks {
                    italic: true,
                    ..marks
                },
                out,
            ),
        }
    }
}

fn push_run(out: &mut Vec<Run>, text: &str, marks: Marks, atom: Atom) {
    if !text.is_empty() {
        out.push(Run {
            text: text.to_string(),
            marks,
            atom,
        });
    }
}

/// Rebuild a canonical inline tree from runs
pub(crate) fn from_runs(runs: Vec<Run>) -> Vec<Inline> {
    let mut out = Vec::new();
    for (bold, group) in group_by(merge_adjacent(runs), |run| run.marks.bold) {
        let inner = italic_layer(group);
        if bold {
            out.push(Inline::Bold(inner));
        } else {
            out.extend(inner);
        }
    }
    out
}

fn italic_layer(runs: Vec<Run>) -> Vec<Inline> {
    let mut out = Vec::new();
    for (italic, group) in group_by(runs, |run| run.marks.italic) {
        let atoms = group.into_iter().map(atom_inline).collect();
        if italic {
            out.push(Inline::Italic(atoms));
        } else {
            out.extend(atoms);
        }
    }
    out
}

fn atom_inline(run: Run) -> Inline {
    match run.atom {
        Atom::Plain => Inline::Text(run.text),
        Atom::Code => Inline::Code(run.text),
        Atom::Link(href) => Inline::Link {
            href,
            text: run.text,
        },
    }
}

fn group_by(runs: Vec<Run>, key: impl Fn(&Run) -> bool) -> Vec<(bool, Vec<Run>)> {
    let mut groups: Vec<(bool, Vec<Run>)> = Vec::new();
    for run in runs {
        let k = key(&run);
        match groups.last_mut() {
            Some((last, group)) if *last == k => group.push(run),
            _ => groups.push((k, vec![run])),
        }
    }
    groups
}

fn merge_adjacent(runs: Vec<Run>) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.text.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(prev) if prev.marks == run.marks && prev.atom == run.atom => {
                prev.text.push_str(&run.text)
            }
            _ => out.push(run),
        }
    }
    out
}

pub(crate) fn runs_len(runs: &[Run]) -> usize {
    runs.iter().map(|run| run.text.len()).sum()
}

/// Largest char boundary in `text` that is not past `offset`
pub(crate) fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Split runs at a byte offset into the concatenated text
pub(crate) fn split_runs(runs: Vec<Run>, offset: usize) -> (Vec<Run>, Vec<Run>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut start = 0;
    for run in runs {
        let end = start + run.text.len();
        if end <= offset {
            left.push(run);
        } else if start >= offset {
            right.push(run);
        } else {
            let local = floor_char_boundary(&run.text, offset - start);
            let mut head = run.clone();
            head.text.truncate(local);
            let mut tail = run;
            tail.text = tail.text[local..].to_string();
            push_nonempty(&mut left, head);
            push_nonempty(&mut right, tail);
        }
        start = end;
    }
    (left, right)
}

fn push_nonempty(out: &mut Vec<Run>, run: Run) {
    if !run.text.is_empty() {
        out.push(run);
    }
}

/// Split runs into before, inside and after a range
fn split_three(runs: Vec<Run>, range: &Range<usize>) -> (Vec<Run>, Vec<Run>, Vec<Run>) {
    let (rest, after) = split_runs(runs, range.end);
    let (before, middle) = split_runs(rest, range.start);
    (before, middle, after)
}

pub(crate) fn split(inlines: &[Inline], offset: usize) -> (Vec<Inline>, Vec<Inline>) {
    let (left, right) = split_runs(to_runs(inlines), offset);
    (from_runs(left), from_runs(right))
}

pub(crate) fn concat(head: &[Inline], tail: &[Inline]) -> Vec<Inline> {
    let mut runs = to_runs(head);
    runs.extend(to_runs(tail));
    from_runs(runs)
}

/// Insert plain text at an offset.
///
/// The new text takes the bold/italic marks of the character before it (or
/// after it at the start of the leaf) but is never code or link text.
pub(crate) fn insert_text(inlines: &[Inline], offset: usize, text: &str) -> Vec<Inline> {
    let (mut left, right) = split_runs(to_runs(inlines), offset);
    let marks = left
        .last()
        .or_else(|| right.first())
        .map(|run| run.marks)
        .unwrap_or_default();
    push_run(&mut left, text, marks, Atom::Plain);
    left.extend(right);
    from_runs(left)
}

pub(crate) fn delete_range(inlines: &[Inline], range: Range<usize>) -> Vec<Inline> {
    let (mut before, _, after) = split_three(to_runs(inlines), &range);
    before.extend(after);
    from_runs(before)
}

/// True when every character in the range carries the mark
pub(crate) fn covered(inlines: &[Inline], range: Range<usize>, mark: Mark) -> bool {
    let (_, middle, _) = split_three(to_runs(inlines), &range);
    !middle.is_empty() && middle.iter().all(|run| run.marks.has(mark))
}

pub(crate) fn set_mark(inlines: &[Inline], range: Range<usize>, mark: Mark, on: bool) -> Vec<Inline> {
    let (mut before, mut middle, after) = split_three(to_runs(inlines), &range);
    for run in &mut middle {
        run.marks.set(mark, on);
    }
    before.extend(middle);
    before.extend(after);
    from_runs(before)
}

/// Replace the text in a range with a single atom holding the same text.
///
/// The atom keeps the marks found at the start of the range. Returns `None`
/// when the range is empty.
pub(crate) fn wrap_range(inlines: &[Inline], range: Range<usize>, atom: Atom) -> Option<Vec<Inline>> {
    let (mut before, middle, after) = split_three(to_runs(inlines), &range);
    let marks = middle.first()?.marks;
    let text: String = middle.iter().map(|run| run.text.as_str()).collect();
    before.push(Run { text, marks, atom });
    before.extend(after);
    Some(from_runs(before))
}

/// Insert an atom at an offset. Returns the new content and the offset just past the atom.
pub(crate) fn insert_atom(
    inlines: &[Inline],
    offset: usize,
    text: &str,
    atom: Atom,
) -> (Vec<Inline>, usize) {
    let (mut left, right) = split_runs(to_runs(inlines), offset);
    let at = runs_len(&left);
    let marks = left.last().map(|run| run.marks).unwrap_or_default();
    push_run(&mut left, text, marks, atom);
    left.extend(right);
    (from_runs(left), at + text.len())
}

/// Locate the plain-text child of `inlines` (a direct child, not nested in
/// formatting) whose span contains `offset`.
///
/// Returns the child's text, `offset` relative to that text and the byte
/// offset where the child starts.
pub(crate) fn direct_text_at(inlines: &[Inline], offset: usize) -> Option<(&str, usize, usize)> {
    let mut start = 0;
    for inline in inlines {
        let len = inline.plain_text().len();
        if let Inline::Text(text) = inline
            && (start..=start + len).contains(&offset)
        {
            return Some((text, offset - start, start));
        }
        start += len;
    }
    None
}
