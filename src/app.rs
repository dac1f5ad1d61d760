use crate::difficulty::Difficulty;
use crate::game::Game;
use crate::menu::MainMenu;
use crate::util::Globals;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    pub(crate) fn new(globals: Globals, difficulty: Difficulty) -> App {
        let screen = Screen::Main(Box::new(MainMenu::new(globals, difficulty)));
        App { screen }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Main(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            tracing::debug!(screen = screen.name(), "switching screens");
            self.screen = screen;
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

/// The screen currently shown
#[derive(Clone, Debug)]
pub(crate) enum Screen {
    Main(Box<MainMenu>),
    Game(Box<Game>),
    Quit,
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Main(_) => "main menu",
            Screen::Game(_) => "game",
            Screen::Quit => "quit",
        }
    }
}
