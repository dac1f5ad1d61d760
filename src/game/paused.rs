use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// A widget for displaying a pause menu pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused {
    /// The currently-selected item in the pause menu
    selection: PauseOpt,
}

impl Paused {
    /// The height that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const HEIGHT: u16 = 6;

    /// The width that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const WIDTH: u16 = 19;

    pub(super) fn new() -> Paused {
        Paused {
            selection: PauseOpt::min(),
        }
    }

    /// Handle an input event.  Returns `Some` if the user made a choice.
    pub(super) fn handle_event(&mut self, event: &Event) -> Option<PauseOpt> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(opt) = PauseOpt::iter().find(|opt| opt.hotkeys().contains(&cmd)) {
            return Some(opt);
        }
        match cmd {
            Command::Enter => return Some(self.selection),
            Command::Up => {
                if let Some(opt) = self.selection.prev() {
                    self.selection = opt;
                }
            }
            Command::Down => {
                if let Some(opt) = self.selection.next() {
                    self.selection = opt;
                }
            }
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }
}

/// The choices in the pause menu
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    /// Unpause the game and its music
    Resume,

    /// Abandon this game and count down to a fresh one
    Restart,

    /// Leave the game for the main menu
    MainMenu,

    /// Quit the application
    Quit,
}

impl PauseOpt {
    fn label(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Resume",
            PauseOpt::Restart => "Restart",
            PauseOpt::MainMenu => "Main Menu",
            PauseOpt::Quit => "Quit",
        }
    }

    /// The key shown next to the option's label
    fn key_label(self) -> &'static str {
        match self {
            PauseOpt::Resume => "p",
            PauseOpt::Restart => "r",
            PauseOpt::MainMenu => "m",
            PauseOpt::Quit => "q",
        }
    }

    /// Commands that pick this option directly
    fn hotkeys(self) -> &'static [Command] {
        match self {
            PauseOpt::Resume => &[Command::P, Command::Esc, Command::Space],
            PauseOpt::Restart => &[Command::R],
            PauseOpt::MainMenu => &[Command::M],
            PauseOpt::Quit => &[Command::Q, Command::Quit],
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(self.label()),
            Span::raw(" ("),
            Span::styled(self.key_label(), consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for Paused {
    /*
     * ┌──── PAUSED ─────┐
     * │ » Resume (p)    │
     * │   Restart (r)   │
     * │   Main Menu (m) │
     * │   Quit (q)      │
     * └─────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use rstest::rstest;

    fn key(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[rstest]
    #[case(KeyCode::Char('p'), PauseOpt::Resume)]
    #[case(KeyCode::Esc, PauseOpt::Resume)]
    #[case(KeyCode::Char(' '), PauseOpt::Resume)]
    #[case(KeyCode::Char('r'), PauseOpt::Restart)]
    #[case(KeyCode::Char('m'), PauseOpt::MainMenu)]
    #[case(KeyCode::Char('q'), PauseOpt::Quit)]
    fn hotkeys(#[case] code: KeyCode, #[case] opt: PauseOpt) {
        let mut paused = Paused::new();
        assert_eq!(paused.handle_event(&key(code)), Some(opt));
    }

    #[test]
    fn navigate_and_choose() {
        let mut paused = Paused::new();
        assert_eq!(paused.handle_event(&key(KeyCode::Up)), None);
        assert_eq!(paused.selection, PauseOpt::Resume);
        assert_eq!(paused.handle_event(&key(KeyCode::Down)), None);
        assert_eq!(paused.handle_event(&key(KeyCode::Down)), None);
        assert_eq!(paused.selection, PauseOpt::MainMenu);
        assert_eq!(paused.handle_event(&key(KeyCode::Tab)), None);
        assert_eq!(paused.handle_event(&key(KeyCode::Tab)), None);
        assert_eq!(paused.selection, PauseOpt::Resume);
        assert_eq!(paused.handle_event(&key(KeyCode::End)), None);
        assert_eq!(
            paused.handle_event(&key(KeyCode::Enter)),
            Some(PauseOpt::Quit)
        );
    }

    #[test]
    fn render() {
        let area = Rect::new(0, 0, Paused::WIDTH, Paused::HEIGHT);
        let mut buffer = Buffer::empty(area);
        Paused::new().render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "┌──── PAUSED ─────┐",
            "│ » Resume (p)    │",
            "│   Restart (r)   │",
            "│   Main Menu (m) │",
            "│   Quit (q)      │",
            "└─────────────────┘",
        ]);
        expected.set_style(area, Style::reset());
        expected.set_style(Rect::new(2, 1, 15, 1), consts::MENU_SELECTION_STYLE);
        expected.set_style(Rect::new(12, 1, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(13, 2, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(15, 3, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(10, 4, 1, 1), consts::KEY_STYLE);
        pretty_assertions::assert_eq!(buffer, expected);
    }
}
