use crate::consts;
use enum_map::{Enum, EnumMap};
use ratatui::style::{Color, Style};

/// One of the three primary colors.  Every food item is tagged with one, and
/// the snake's hue is tracked per channel.
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Channel::Red => "Red",
            Channel::Green => "Green",
            Channel::Blue => "Blue",
        }
    }

    /// Style used for food of this channel
    pub(crate) fn style(self) -> Style {
        match self {
            Channel::Red => consts::RED_STYLE,
            Channel::Green => consts::GREEN_STYLE,
            Channel::Blue => consts::BLUE_STYLE,
        }
    }
}

/// Which way eating a channel pushes the accumulators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Polarity {
    /// The eaten channel goes up and the other two go down
    Saturate,

    /// The eaten channel goes down and the other two go up
    Detoxify,
}

impl Polarity {
    /// Signed change applied to `channel` when food of channel `eaten` is
    /// consumed
    fn delta(self, channel: Channel, eaten: Channel) -> f64 {
        let toward = if channel == eaten {
            consts::COLOR_STEP
        } else {
            -consts::COLOR_STEP
        };
        match self {
            Polarity::Saturate => toward,
            Polarity::Detoxify => -toward,
        }
    }
}

/// The snake's color: three unbounded accumulators plus a tally of how many
/// items of each channel have been eaten.
///
/// The accumulators are allowed to wander outside `[0, 1]`; they are only
/// clamped when a displayable color is requested.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColorBlend {
    pub(super) levels: EnumMap<Channel, f64>,
    eaten: EnumMap<Channel, u32>,
    polarity: Polarity,
}

impl ColorBlend {
    pub(crate) fn new(levels: EnumMap<Channel, f64>, polarity: Polarity) -> ColorBlend {
        ColorBlend {
            levels,
            eaten: EnumMap::default(),
            polarity,
        }
    }

    /// Record that a food item of the given channel was eaten
    pub(crate) fn absorb(&mut self, eaten: Channel) {
        for (channel, level) in &mut self.levels {
            *level += self.polarity.delta(channel, eaten);
        }
        self.eaten[eaten] += 1;
    }

    pub(crate) fn eaten(&self) -> EnumMap<Channel, u32> {
        self.eaten
    }

    /// The raw, unclamped accumulator values
    pub(crate) fn levels(&self) -> EnumMap<Channel, f64> {
        self.levels
    }

    /// The accumulators clamped to `[0, 1]`
    pub(crate) fn display(&self) -> Rgb {
        let clamped = self.levels.map(|_, v| v.clamp(0.0, 1.0));
        Rgb {
            red: clamped[Channel::Red],
            green: clamped[Channel::Green],
            blue: clamped[Channel::Blue],
        }
    }
}

/// A color with each component in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgb {
    pub(crate) red: f64,
    pub(crate) green: f64,
    pub(crate) blue: f64,
}

impl Rgb {
    pub(crate) fn to_terminal(self) -> Color {
        Color::Rgb(
            to_byte(self.red),
            to_byte(self.green),
            to_byte(self.blue),
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(component: f64) -> u8 {
    // `component` is in [0, 1], so the product is in [0, 255].
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}
