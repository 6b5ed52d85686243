mod host;
mod view;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    io::stdout,
    path::{Path, PathBuf},
    process,
    time::Duration,
};
use storyline_config::Config;
use storyline_engine::{
    Document, EditorSettings, FormatCommand, HeadingLevel, HostMessage, Key, KeyPress, ListKind,
    Motion, Selection, StatusScope, Surface, SurfaceEvent, SurfaceHost, io, selection, to_html,
};

use crate::host::TerminalHost;
use crate::view::View;

const SURFACE_ID: &str = "visual-editor-1";

/// What a key press means to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Quit,
    Save,
    Surface(SurfaceEvent),
    Format(FormatCommand),
    Move { motion: Motion, extend: bool },
    Ignore,
}

fn main() -> Result<()> {
    // RUST_LOG overrides; stderr shares the screen with the TUI so default to warnings
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let path = match args.as_slice() {
        [_, flag, file] if flag == "--render" => {
            let markdown = io::read_markdown(Path::new(file))?;
            println!("{}", to_html(&Document::from_markdown(&markdown)));
            return Ok(());
        }
        [_, flag] if flag == "--init-config" => return init_config(config.as_ref()),
        [_, file] if !file.starts_with("--") => Some(PathBuf::from(file)),
        [_] => config.as_ref().and_then(|c| c.document_path.clone()),
        _ => {
            eprintln!("Usage: {} [markdown-file]", args[0]);
            eprintln!("       {} --render <markdown-file>", args[0]);
            eprintln!("       {} --init-config", args[0]);
            process::exit(1);
        }
    };

    let initial = match &path {
        Some(path) if path.exists() => io::read_markdown(path)?,
        _ => String::new(),
    };
    let settings = settings_from_config(config.as_ref());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let title = path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "untitled".to_string());
    let mut host = TerminalHost::new(terminal, View::new(title));

    let res = run_app(&mut host, &initial, settings, path.as_deref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        host.terminal_mut().backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableFocusChange
    )?;
    host.terminal_mut().show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(
    host: &mut TerminalHost,
    initial: &str,
    settings: EditorSettings,
    path: Option<&Path>,
) -> Result<()> {
    let mut surface = Surface::attach(SURFACE_ID, initial, settings, host);
    // The terminal owns focus while the editor runs
    surface.handle(SurfaceEvent::Focus, host);
    surface.refresh(host);
    host.terminal_mut().clear()?;

    let mut redraw = true;
    loop {
        if redraw {
            host.view.show_document(surface.document());
            host.draw()?;
            redraw = false;
        }

        if event::poll(Duration::from_millis(10))? {
            redraw = true;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match map_key(key) {
                    Action::Quit => {
                        save(&surface, path, host)?;
                        surface.detach();
                        return Ok(());
                    }
                    Action::Save => save(&surface, path, host)?,
                    Action::Surface(event) => {
                        surface.handle(event, host);
                    }
                    Action::Format(command) => {
                        let message = HostMessage::FormatText {
                            command,
                            editor_id: surface.id().to_string(),
                        };
                        surface.receive(&message.to_json()?, host);
                    }
                    Action::Move { motion, extend } => move_caret(&mut surface, host, motion, extend),
                    Action::Ignore => {}
                },
                Event::Paste(text) => {
                    surface.handle(SurfaceEvent::Paste(text), host);
                }
                Event::FocusGained => {
                    surface.handle(SurfaceEvent::Focus, host);
                }
                Event::FocusLost => {
                    surface.handle(SurfaceEvent::Blur, host);
                }
                Event::Resize(..) => surface.updated(host),
                _ => {}
            }
        }

        if surface.has_pending_sync() {
            surface.tick(host);
            redraw = true;
        }
    }
}

fn map_key(key: KeyEvent) -> Action {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let key_down = |press: KeyPress| Action::Surface(SurfaceEvent::KeyDown(press));
    let movement = |motion| Action::Move {
        motion,
        extend: shift,
    };

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('s') if ctrl => Action::Save,
        KeyCode::Char(c) if ctrl => key_down(KeyPress::new(Key::Char(c.to_ascii_lowercase())).ctrl()),
        KeyCode::Char(c) => Action::Surface(SurfaceEvent::Input(c.to_string())),
        KeyCode::Enter if shift => key_down(KeyPress::new(Key::Enter).shift()),
        KeyCode::Enter => key_down(KeyPress::new(Key::Enter)),
        KeyCode::Tab => key_down(KeyPress::new(Key::Tab)),
        KeyCode::Backspace => key_down(KeyPress::new(Key::Backspace)),
        KeyCode::Left => movement(Motion::Left),
        KeyCode::Right => movement(Motion::Right),
        KeyCode::Up => movement(Motion::PreviousLeaf),
        KeyCode::Down => movement(Motion::NextLeaf),
        KeyCode::Home => movement(Motion::LineStart),
        KeyCode::End => movement(Motion::LineEnd),
        KeyCode::F(n) => function_key_format(n).map_or(Action::Ignore, Action::Format),
        _ => Action::Ignore,
    }
}

fn function_key_format(n: u8) -> Option<FormatCommand> {
    match n {
        1 => Some(FormatCommand::Heading(HeadingLevel::H1)),
        2 => Some(FormatCommand::Heading(HeadingLevel::H2)),
        3 => Some(FormatCommand::Heading(HeadingLevel::H3)),
        4 => Some(FormatCommand::List(ListKind::Unordered)),
        5 => Some(FormatCommand::List(ListKind::Ordered)),
        6 => Some(FormatCommand::Quote),
        7 => Some(FormatCommand::Code),
        8 => Some(FormatCommand::CodeBlock),
        _ => None,
    }
}

/// Move the caret in the host, then tell the surface
fn move_caret(surface: &mut Surface, host: &mut TerminalHost, motion: Motion, extend: bool) {
    let Some(current) = surface.selection() else {
        return;
    };
    let Some(focus) = selection::step(surface.document(), current.focus, motion) else {
        return;
    };
    let moved = if extend {
        Selection::new(current.anchor, focus)
    } else {
        Selection::new(focus, focus)
    };
    surface.select(Some(moved));
    host.apply_selection(moved);
}

fn save(surface: &Surface, path: Option<&Path>, host: &mut TerminalHost) -> Result<()> {
    let Some(path) = path else {
        host.view.notice = Some("No file to save to".to_string());
        return Ok(());
    };
    io::write_document(path, surface.document())?;
    log::info!("saved {}", path.display());
    host.view.notice = Some(format!("Saved {}", path.display()));
    Ok(())
}

fn settings_from_config(config: Option<&Config>) -> EditorSettings {
    let mut settings = EditorSettings::default();
    let Some(config) = config else {
        return settings;
    };

    if let Some(text) = &config.placeholder_text {
        settings.placeholder_text = text.clone();
    }
    if let Some(text) = &config.code_block_placeholder {
        settings.code_block_placeholder = text.clone();
    }
    if let Some(url) = &config.link_default {
        settings.link_default = url.clone();
    }
    if let Some(rate) = config.words_per_minute.filter(|rate| *rate > 0) {
        settings.words_per_minute = rate;
    }
    if let Some(tab) = &config.tab_text {
        settings.tab_text = tab.clone();
    }
    if let Some(scope) = config.status_scope {
        settings.status_scope = match scope {
            storyline_config::StatusScope::PerSurface => StatusScope::PerSurface,
            storyline_config::StatusScope::Shared => StatusScope::Shared,
        };
    }
    settings
}

/// Write a config file holding the built-in defaults
fn init_config(existing: Option<&Config>) -> Result<()> {
    let config_path = Config::config_path();
    if existing.is_some() {
        eprintln!("Config file already exists at {}", config_path.display());
        process::exit(1);
    }

    let defaults = EditorSettings::default();
    let config = Config {
        placeholder_text: Some(defaults.placeholder_text),
        code_block_placeholder: Some(defaults.code_block_placeholder),
        link_default: Some(defaults.link_default),
        words_per_minute: Some(defaults.words_per_minute),
        tab_text: Some(defaults.tab_text),
        status_scope: Some(storyline_config::StatusScope::PerSurface),
        document_path: None,
    };
    config.save()?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[rstest]
    #[case(press(KeyCode::Esc, KeyModifiers::NONE), Action::Quit)]
    #[case(press(KeyCode::Char('s'), KeyModifiers::CONTROL), Action::Save)]
    #[case(
        press(KeyCode::Char('B'), KeyModifiers::CONTROL),
        Action::Surface(SurfaceEvent::KeyDown(KeyPress::new(Key::Char('b')).ctrl()))
    )]
    #[case(
        press(KeyCode::Char('x'), KeyModifiers::NONE),
        Action::Surface(SurfaceEvent::Input("x".to_string()))
    )]
    #[case(
        press(KeyCode::Enter, KeyModifiers::SHIFT),
        Action::Surface(SurfaceEvent::KeyDown(KeyPress::new(Key::Enter).shift()))
    )]
    #[case(
        press(KeyCode::Left, KeyModifiers::SHIFT),
        Action::Move { motion: Motion::Left, extend: true }
    )]
    #[case(
        press(KeyCode::Down, KeyModifiers::NONE),
        Action::Move { motion: Motion::NextLeaf, extend: false }
    )]
    #[case(
        press(KeyCode::F(2), KeyModifiers::NONE),
        Action::Format(FormatCommand::Heading(HeadingLevel::H2))
    )]
    #[case(press(KeyCode::F(8), KeyModifiers::NONE), Action::Format(FormatCommand::CodeBlock))]
    #[case(press(KeyCode::F(12), KeyModifiers::NONE), Action::Ignore)]
    fn test_map_key(#[case] key: KeyEvent, #[case] action: Action) {
        assert_eq!(map_key(key), action);
    }

    #[test]
    fn test_settings_without_config() {
        assert_eq!(settings_from_config(None), EditorSettings::default());
    }

    #[test]
    fn test_settings_from_partial_config() {
        let config = Config {
            words_per_minute: Some(120),
            status_scope: Some(storyline_config::StatusScope::Shared),
            tab_text: Some("\t".to_string()),
            ..Config::default()
        };

        let settings = settings_from_config(Some(&config));

        assert_eq!(settings.words_per_minute, 120);
        assert_eq!(settings.status_scope, StatusScope::Shared);
        assert_eq!(settings.tab_text, "\t");
        assert_eq!(
            settings.placeholder_text,
            EditorSettings::default().placeholder_text
        );
    }

    #[test]
    fn test_zero_reading_rate_is_ignored() {
        let config = Config {
            words_per_minute: Some(0),
            ..Config::default()
        };
        assert_eq!(
            settings_from_config(Some(&config)).words_per_minute,
            EditorSettings::default().words_per_minute
        );
    }
}
