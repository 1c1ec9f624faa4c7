use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use gc_ascii::mapper::remap;
use gc_core::charset::SymbolRamp;
use gc_core::config::Settings;
use gc_core::frame::DisplayFrame;
use gc_core::traits::DisplaySink;
use gc_player::{LatestFrame, PlaybackState, Player};
use gc_source::VideoSource;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use crate::export::Exports;

/// Input poll timeout; also the redraw latency for new frames.
const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePause,
    ToggleInvert,
    Quit,
    Ignore,
}

#[must_use]
pub fn key_action(code: KeyCode) -> Action {
    match code {
        KeyCode::Char(' ') => Action::TogglePause,
        KeyCode::Char('i') => Action::ToggleInvert,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::Ignore,
    }
}

/// Play a video in the terminal until the user quits, then export the last
/// frame shown.
///
/// # Errors
/// Returns an error if the video cannot be opened or the terminal fails.
pub fn run(path: &Path, settings: Arc<ArcSwap<Settings>>, exports: &Exports) -> Result<()> {
    let source = VideoSource::open(path)?;
    let latest = Arc::new(LatestFrame::new());
    let sink: Arc<dyn DisplaySink> = Arc::clone(&latest) as Arc<dyn DisplaySink>;
    let mut player = Player::new(settings, sink);
    player.open(source)?;

    let terminal = ratatui::init();
    let result = display_loop(terminal, &player, &latest);
    // Always restore, even on error.
    ratatui::restore();
    player.close();

    if let Some(frame) = latest.current() {
        let grid = export_grid(&frame, player.settings().load().invert_export);
        exports.best_effort(Some(&grid));
    }
    result
}

fn display_loop(mut terminal: DefaultTerminal, player: &Player, latest: &LatestFrame) -> Result<()> {
    let mut drawn: Option<(u64, PlaybackState)> = None;

    loop {
        let now = (latest.generation(), player.state());
        if drawn != Some(now) {
            let frame = latest.current();
            terminal.draw(|f| draw(f, frame.as_deref(), now.1))?;
            drawn = Some(now);
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match key_action(code) {
                Action::TogglePause => player.toggle_pause(),
                Action::ToggleInvert => {
                    player.settings().rcu(|s| Settings {
                        invert_display: !s.invert_display,
                        ..Settings::clone(s)
                    });
                    log::debug!("Display inversion toggled");
                }
                Action::Quit => return Ok(()),
                Action::Ignore => {}
            },
            Event::Resize(..) => drawn = None,
            _ => {}
        }
    }
}

fn draw(f: &mut Frame, frame: Option<&DisplayFrame>, state: PlaybackState) {
    let status = match state {
        PlaybackState::Idle => "idle",
        PlaybackState::Running => "playing",
        PlaybackState::Paused => "paused",
        PlaybackState::Cancelled => "ended",
    };
    let (text, title) = match frame {
        Some(frame) => (
            frame.text(),
            format!(
                " {} | {} | {status} ",
                frame.grid.dimensions_label(),
                frame.source_label()
            ),
        ),
        None => (String::new(), format!(" {status} ")),
    };

    let view = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(Line::from(" space pause | i invert | q quit ")),
    );
    f.render_widget(view, f.area());
}

/// The displayed grid re-expressed in the export ramp.
fn export_grid(frame: &DisplayFrame, invert_export: bool) -> gc_core::frame::AsciiGrid {
    remap(
        &frame.grid,
        &SymbolRamp::for_invert(frame.inverted),
        &SymbolRamp::for_invert(invert_export),
    )
}

#[cfg(test)]
mod tests {
    use gc_core::frame::AsciiGrid;

    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action(KeyCode::Char(' ')), Action::TogglePause);
        assert_eq!(key_action(KeyCode::Char('i')), Action::ToggleInvert);
        assert_eq!(key_action(KeyCode::Char('q')), Action::Quit);
        assert_eq!(key_action(KeyCode::Esc), Action::Quit);
        assert_eq!(key_action(KeyCode::Enter), Action::Ignore);
    }

    #[test]
    fn export_grid_follows_export_ramp() {
        let frame = DisplayFrame {
            grid: AsciiGrid::from_lines("@ "),
            source_size: (2, 1),
            sequence: 3,
            inverted: true,
        };
        assert_eq!(export_grid(&frame, true).to_text(), "@ ");
        assert_eq!(export_grid(&frame, false).to_text(), " @");
    }
}
