use crate::game::color::{Channel, Polarity};
use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two game modes a player can choose from
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Difficulty {
    /// "Herb Gathering": the snake starts bright and saturates toward the
    /// colors it eats.
    #[default]
    Normal,

    /// "Black Venom Antidote": the snake starts nearly black, and every herb
    /// drives out a bit of the poison.
    Advanced,
}

impl Difficulty {
    pub(crate) fn profile(self) -> &'static Profile {
        match self {
            Difficulty::Normal => &NORMAL,
            Difficulty::Advanced => &ADVANCED,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Advanced => "advanced",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Difficulty::Normal => "Herb Gathering",
            Difficulty::Advanced => "Black Venom Antidote",
        }
    }

    /// A short blurb shown under the difficulty selector in the main menu
    pub(crate) fn description(self) -> [&'static str; 2] {
        match self {
            Difficulty::Normal => [
                "Gather herbs; the snake's hue",
                "soaks up every one it eats.",
            ],
            Difficulty::Advanced => [
                "Poisoned black, the snake eats",
                "herbs to win its colors back.",
            ],
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Difficulty, ParseDifficultyError> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Difficulty::Normal),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid difficulty {0:?}; expected \"normal\" or \"advanced\"")]
pub(crate) struct ParseDifficultyError(String);

/// Static tuning for a difficulty.  Read-only for the whole session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Profile {
    pub(crate) rows: i32,
    pub(crate) cols: i32,

    /// Seconds between ticks when a game starts
    pub(crate) initial_tick: f64,

    /// Speed up each time the score reaches a multiple of this
    pub(crate) accelerate_every: u32,

    /// Seconds shaved off the tick interval per speed-up
    pub(crate) acceleration_step: f64,

    /// The tick interval never drops below this
    pub(crate) minimum_tick: f64,

    /// Shown on the game-over panel
    pub(crate) end_message: &'static str,

    /// Whether eating a channel raises or lowers that channel
    pub(crate) polarity: Polarity,
}

impl Profile {
    /// Starting values of the snake's color accumulators
    pub(crate) fn initial_color(&self) -> EnumMap<Channel, f64> {
        match self.polarity {
            // Red, green, blue
            Polarity::Saturate => EnumMap::from_array([0.5, 0.8, 0.7]),
            Polarity::Detoxify => EnumMap::from_array([0.15, 0.2, 0.18]),
        }
    }
}

static NORMAL: Profile = Profile {
    rows: 20,
    cols: 20,
    initial_tick: 0.30,
    accelerate_every: 5,
    acceleration_step: 0.005,
    minimum_tick: 0.06,
    end_message: "A bountiful harvest today! Hiss~",
    polarity: Polarity::Saturate,
};

static ADVANCED: Profile = Profile {
    rows: 20,
    cols: 20,
    initial_tick: 0.25,
    accelerate_every: 5,
    acceleration_step: 0.005,
    minimum_tick: 0.05,
    end_message: "Hiss~ feeling a little better now.",
    polarity: Polarity::Detoxify,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("normal", Difficulty::Normal)]
    #[case("Advanced", Difficulty::Advanced)]
    #[case("ADVANCED", Difficulty::Advanced)]
    fn parse(#[case] s: &str, #[case] d: Difficulty) {
        assert_eq!(s.parse::<Difficulty>(), Ok(d));
    }

    #[test]
    fn parse_invalid() {
        assert!("hard".parse::<Difficulty>().is_err());
    }

    #[test]
    fn profiles_differ_in_speed_and_polarity() {
        let normal = Difficulty::Normal.profile();
        let advanced = Difficulty::Advanced.profile();
        assert_eq!((normal.rows, normal.cols), (advanced.rows, advanced.cols));
        assert!(advanced.initial_tick < normal.initial_tick);
        assert!(advanced.minimum_tick < normal.minimum_tick);
        assert_eq!(normal.polarity, Polarity::Saturate);
        assert_eq!(advanced.polarity, Polarity::Detoxify);
    }

    #[test]
    fn advanced_starts_dark() {
        let color = Difficulty::Advanced.profile().initial_color();
        assert!(color.values().all(|&v| v < 0.25));
    }

    #[rstest]
    #[case(Difficulty::Normal, [0.5, 0.8, 0.7])]
    #[case(Difficulty::Advanced, [0.15, 0.2, 0.18])]
    fn initial_color_channels(#[case] difficulty: Difficulty, #[case] rgb: [f64; 3]) {
        let color = difficulty.profile().initial_color();
        for (channel, expected) in [Channel::Red, Channel::Green, Channel::Blue]
            .into_iter()
            .zip(rgb)
        {
            assert!(
                (color[channel] - expected).abs() < 1e-12,
                "{channel:?} started at {}, expected {expected}",
                color[channel]
            );
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Advanced).unwrap(),
            "\"advanced\""
        );
    }
}
