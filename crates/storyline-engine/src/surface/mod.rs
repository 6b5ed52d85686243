//! Surface lifecycle: one editable region bound to a host.
//!
//! A [`Surface`] owns the document and selection mirror for one editing region.
//! The host feeds it [`SurfaceEvent`]s and formatting messages; after every
//! mutation the surface pushes the Markdown projection to the value and
//! reactive sinks, the new caret to the host and the word count to the status
//! display.

mod message;

use std::collections::HashSet;

pub use message::HostMessage;

use crate::editing::{
    BlockKind, Cmd, Document, FormatCommand, Patch, Prompter, Selection, SelectionTracker,
};
use crate::markdown::to_markdown;
use crate::settings::{EditorSettings, StatusScope};
use crate::stats::ReadingEstimate;

/// Fixed status selector used when every surface shares one display
pub const SHARED_STATUS_SELECTOR: &str = ".editor-header .text-sm";

/// Where the word count is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTarget {
    /// An element addressed by id
    Id(String),
    /// An element addressed by selector, shared by all surfaces
    Selector(String),
}

/// The host side of a surface: the platform that owns the live selection,
/// the output sinks and the user prompts.
pub trait SurfaceHost: Prompter {
    fn apply_selection(&mut self, selection: Selection);

    /// Write the Markdown projection to the form value sink
    fn write_value(&mut self, sink: &str, markdown: &str);

    /// Write the Markdown projection to the reactive sink
    fn write_reactive(&mut self, sink: &str, markdown: &str);

    /// Tell the host the reactive sink changed
    fn notify_input(&mut self, sink: &str);

    fn write_status(&mut self, target: &StatusTarget, text: &str);
}

/// Output element names derived from a surface id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sinks {
    pub value: String,
    pub reactive: String,
    pub status: StatusTarget,
}

impl Sinks {
    pub fn for_surface(id: &str, scope: StatusScope) -> Self {
        let suffix = id_suffix(id);
        let status = match scope {
            StatusScope::PerSurface => StatusTarget::Id(format!("word-count-{suffix}")),
            StatusScope::Shared => StatusTarget::Selector(SHARED_STATUS_SELECTOR.to_string()),
        };
        Self {
            value: format!("hidden-{suffix}"),
            reactive: format!("visual-content-{suffix}"),
            status,
        }
    }
}

/// The part of a surface id after its last `-`
pub fn id_suffix(id: &str) -> &str {
    id.rsplit('-').next().unwrap_or(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Backspace,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            meta: false,
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Formatting bound to Ctrl/Cmd + key
    fn format_command(&self) -> Option<FormatCommand> {
        if !(self.ctrl || self.meta) {
            return None;
        }
        match self.key {
            Key::Char('b') => Some(FormatCommand::Bold),
            Key::Char('i') => Some(FormatCommand::Italic),
            Key::Char('k') => Some(FormatCommand::Link),
            _ => None,
        }
    }
}

/// Events delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Text typed at the current selection
    Input(String),
    KeyDown(KeyPress),
    /// Plain text from the clipboard
    Paste(String),
    Focus,
    Blur,
    /// A formatting command from the dispatcher, addressed to a surface id
    Format {
        command: FormatCommand,
        editor_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    KeyDown,
    Paste,
    Focus,
    Blur,
    Format,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Input,
        EventKind::KeyDown,
        EventKind::Paste,
        EventKind::Focus,
        EventKind::Blur,
        EventKind::Format,
    ];
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SurfaceEvent::Input(_) => EventKind::Input,
            SurfaceEvent::KeyDown(_) => EventKind::KeyDown,
            SurfaceEvent::Paste(_) => EventKind::Paste,
            SurfaceEvent::Focus => EventKind::Focus,
            SurfaceEvent::Blur => EventKind::Blur,
            SurfaceEvent::Format { .. } => EventKind::Format,
        }
    }
}

/// One attached editing surface
#[derive(Debug, Clone)]
pub struct Surface {
    id: String,
    document: Document,
    selection: SelectionTracker,
    listeners: HashSet<EventKind>,
    settings: EditorSettings,
    sinks: Sinks,
    /// Set by paste; the projection is pushed on the next `tick`
    pending_sync: bool,
}

impl Surface {
    /// Bind a surface to `id`, loading `initial_markdown` or seeding the
    /// placeholder when it is blank, and place the caret.
    pub fn attach<H: SurfaceHost>(
        id: impl Into<String>,
        initial_markdown: &str,
        settings: EditorSettings,
        host: &mut H,
    ) -> Self {
        let id = id.into();
        let document = if initial_markdown.trim().is_empty() {
            Document::with_placeholder(settings.placeholder_text.as_str())
        } else {
            Document::from_markdown(initial_markdown)
        };
        let sinks = Sinks::for_surface(&id, settings.status_scope);

        let mut surface = Self {
            id,
            document,
            selection: SelectionTracker::new(),
            listeners: EventKind::ALL.into_iter().collect(),
            settings,
            sinks,
            pending_sync: false,
        };
        surface.focus_first_paragraph(host);
        log::info!("attached surface {}", surface.id);
        surface
    }

    /// Unregister all listeners. Later events are ignored.
    pub fn detach(&mut self) {
        self.listeners.clear();
        log::info!("detached surface {}", self.id);
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Host re-rendered the surface: re-apply the last known selection
    pub fn updated<H: SurfaceHost>(&mut self, host: &mut H) {
        if let Some(selection) = self.selection.restore(&self.document) {
            host.apply_selection(selection);
        }
    }

    /// The host's selection changed
    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection.set_current(selection);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.current()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn sinks(&self) -> &Sinks {
        &self.sinks
    }

    pub fn has_pending_sync(&self) -> bool {
        self.pending_sync
    }

    pub fn markdown(&self) -> String {
        to_markdown(&self.document)
    }

    pub fn estimate(&self) -> ReadingEstimate {
        ReadingEstimate::with_rate(&self.document.text_content(), self.settings.words_per_minute)
    }

    /// Handle one host event. Returns the patch when the document changed.
    pub fn handle<H: SurfaceHost>(&mut self, event: SurfaceEvent, host: &mut H) -> Option<Patch> {
        if !self.listeners.contains(&event.kind()) {
            log::debug!("surface {} ignoring {:?}", self.id, event.kind());
            return None;
        }
        match event {
            SurfaceEvent::Input(text) => self.on_input(text, host),
            SurfaceEvent::KeyDown(key) => self.on_key_down(key, host),
            SurfaceEvent::Paste(text) => self.on_paste(text, host),
            SurfaceEvent::Focus => self.on_focus(host),
            SurfaceEvent::Blur => {
                self.on_blur();
                None
            }
            SurfaceEvent::Format { command, editor_id } => {
                if editor_id != self.id {
                    log::debug!("surface {} ignoring `{command}` for {editor_id}", self.id);
                    return None;
                }
                self.run_format(command, host)
            }
        }
    }

    /// Handle a JSON message from the command dispatcher.
    ///
    /// Malformed messages and unknown commands are logged and ignored.
    pub fn receive<H: SurfaceHost>(&mut self, json: &str, host: &mut H) -> Option<Patch> {
        match HostMessage::parse(json) {
            Ok(HostMessage::FormatText { command, editor_id }) => {
                self.handle(SurfaceEvent::Format { command, editor_id }, host)
            }
            Err(err) => {
                log::debug!("surface {} dropping message: {err}", self.id);
                None
            }
        }
    }

    /// Flush work deferred to the next host tick
    pub fn tick<H: SurfaceHost>(&mut self, host: &mut H) {
        if std::mem::take(&mut self.pending_sync) {
            self.sync(host);
            self.update_word_count(host);
        }
    }

    /// Push the projection and word count without a mutation
    pub fn refresh<H: SurfaceHost>(&mut self, host: &mut H) {
        self.sync(host);
        self.update_word_count(host);
    }

    fn on_input<H: SurfaceHost>(&mut self, text: String, host: &mut H) -> Option<Patch> {
        self.selection.snapshot();
        let selection = self.current_selection()?;
        let mut patch = self.document.apply(Cmd::InsertText { text }, &selection)?;
        if let Some(converted) = self.document.apply_shortcut(patch.new_selection.focus) {
            patch = converted;
        }
        self.commit(&patch, host);
        Some(patch)
    }

    fn on_key_down<H: SurfaceHost>(&mut self, key: KeyPress, host: &mut H) -> Option<Patch> {
        if let Some(command) = key.format_command() {
            return self.run_format(command, host);
        }
        let cmd = match key.key {
            Key::Enter if key.shift => Cmd::InsertLineBreak,
            Key::Enter => Cmd::InsertParagraph,
            Key::Tab => Cmd::InsertText {
                text: self.settings.tab_text.clone(),
            },
            Key::Backspace => Cmd::DeleteBackward,
            Key::Char(_) | Key::Other => return None,
        };
        self.selection.snapshot();
        let selection = self.current_selection()?;
        let patch = self.document.apply(cmd, &selection)?;
        self.commit(&patch, host);
        Some(patch)
    }

    fn on_paste<H: SurfaceHost>(&mut self, text: String, host: &mut H) -> Option<Patch> {
        self.selection.snapshot();
        let selection = self.current_selection()?;
        let patch = self.document.apply(Cmd::InsertText { text }, &selection)?;
        self.selection.set_current(Some(patch.new_selection));
        host.apply_selection(patch.new_selection);
        self.pending_sync = true;
        Some(patch)
    }

    /// Clear the placeholder so the user starts in an empty paragraph
    fn on_focus<H: SurfaceHost>(&mut self, host: &mut H) -> Option<Patch> {
        if !self.document.is_placeholder() {
            return None;
        }
        let leaf = self.document.clear_placeholder();
        let selection = Selection::caret(leaf, 0);
        self.selection.set_current(Some(selection));
        host.apply_selection(selection);
        Some(Patch {
            changed: vec![leaf],
            new_selection: selection,
            version: self.document.version(),
        })
    }

    fn on_blur(&mut self) {
        if self.document.is_placeholder() || !self.document.is_blank() {
            return;
        }
        self.document.seed_placeholder(&self.settings.placeholder_text);
        self.selection.set_current(None);
    }

    fn run_format<H: SurfaceHost>(&mut self, command: FormatCommand, host: &mut H) -> Option<Patch> {
        self.selection.snapshot();
        let selection = self.current_selection();
        let patch = self
            .document
            .format(command, selection.as_ref(), host, &self.settings)?;
        self.commit(&patch, host);
        Some(patch)
    }

    /// Current selection, clamped. `None` when there is none or it went stale.
    fn current_selection(&self) -> Option<Selection> {
        let selection = self.selection.current()?.clamped(&self.document);
        if selection.is_none() {
            log::debug!("surface {} has a stale selection", self.id);
        }
        selection
    }

    fn commit<H: SurfaceHost>(&mut self, patch: &Patch, host: &mut H) {
        self.selection.set_current(Some(patch.new_selection));
        self.selection.snapshot();
        host.apply_selection(patch.new_selection);
        self.sync(host);
        self.update_word_count(host);
    }

    fn sync<H: SurfaceHost>(&mut self, host: &mut H) {
        let markdown = to_markdown(&self.document);
        host.write_value(&self.sinks.value, &markdown);
        host.write_reactive(&self.sinks.reactive, &markdown);
        host.notify_input(&self.sinks.reactive);
    }

    fn update_word_count<H: SurfaceHost>(&mut self, host: &mut H) {
        let status = self.estimate().to_string();
        host.write_status(&self.sinks.status, &status);
    }

    /// Put the caret at the end of the first paragraph (or placeholder)
    fn focus_first_paragraph<H: SurfaceHost>(&mut self, host: &mut H) {
        let leaf = self
            .document
            .blocks()
            .iter()
            .find(|block| matches!(block.kind, BlockKind::Paragraph(_) | BlockKind::Placeholder(_)))
            .map(|block| block.id)
            .or_else(|| self.document.first_leaf());
        if let Some(leaf) = leaf
            && let Some(selection) = self.selection.move_cursor_to_end(&self.document, leaf)
        {
            host.apply_selection(selection);
        }
    }
}
