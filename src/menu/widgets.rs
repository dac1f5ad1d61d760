use crate::consts;
use crate::game::color::Channel;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Widget,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    /// Widths of the "Ch", "ro", & "ma" letter pairs, which are tinted red,
    /// green, & blue
    const CHROMA_SPLIT: [u16; 3] = [14, 13, 18];
    const CHROMA_WIDTH: u16 = 45;
    const SNAKE_WIDTH: u16 = 28;
    const SNAKE_BODY_LENGTH: usize = 4;
    const TEXT_HEIGHT: u16 = 5;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = Self::CHROMA_WIDTH + Self::SNAKE_WIDTH;

    #[rustfmt::skip]
    const CHROMA: [&'static str; Self::TEXT_HEIGHT as usize] = [
         "  ____  _                                    ",
         " / ___|| |__   _ __   ___   _ __ ___    __ _ ",
        r"| |    | '_ \ | '__| / _ \ | '_ ` _ \  / _` |",
         "| |___ | | | || |   | (_) || | | | | || (_| |",
        r" \____||_| |_||_|    \___/ |_| |_| |_| \__,_|",
    ];

    #[rustfmt::skip]
    const SNAKE: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____              _        ",
         "/ ___| _ __   __ _| | _____ ",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Start)
            .areas(area);
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        let [chroma_area, snake_area] =
            Layout::horizontal([Self::CHROMA_WIDTH, Self::SNAKE_WIDTH])
                .flex(Flex::Start)
                .areas(words_area);
        Text::from_iter(Self::CHROMA).render(chroma_area, buf);
        let pairs: [Rect; 3] = Layout::horizontal(Self::CHROMA_SPLIT)
            .flex(Flex::Start)
            .areas(chroma_area);
        for (channel, pair) in [Channel::Red, Channel::Green, Channel::Blue]
            .into_iter()
            .zip(pairs)
        {
            buf.set_style(pair, channel.style());
        }
        Text::from_iter(Self::SNAKE)
            .style(consts::SNAKE_STYLE)
            .render(snake_area, buf);

        let mut diagram = Line::from_iter([
            Span::styled(
                consts::SNAKE_BODY_SYMBOL.repeat(Self::SNAKE_BODY_LENGTH),
                consts::SNAKE_STYLE,
            ),
            Span::styled(consts::SNAKE_HEAD_EAST_SYMBOL, consts::SNAKE_STYLE),
            Span::raw("  "),
        ]);
        for channel in [Channel::Red, Channel::Green, Channel::Blue] {
            diagram.push_span(Span::styled(consts::FOOD_SYMBOL, channel.style()));
        }
        diagram.centered().render(diagram_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 3;
    pub(super) const WIDTH: u16 = 42;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys = |k: &'static str| Span::styled(k, consts::KEY_STYLE);
        let text = Text::from_iter([
            Line::from_iter([
                Span::raw("Steer: "),
                keys("← ↓ ↑ →"),
                Span::raw("  or  "),
                keys("h j k l"),
                Span::raw("  or  "),
                keys("a s w d"),
            ]),
            Line::from("Each herb blends its color into the snake."),
            Line::from("Don't run into the walls or yourself!"),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        debug_assert_eq!(
            text.width(),
            usize::from(Self::WIDTH),
            "Instructions::WIDTH is wrong"
        );
        text.render(area, buf);
    }
}
