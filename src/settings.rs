use std::{fmt, time::Duration};

use clap::ValueEnum;

use crate::TermInt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BoardSize {
    Small,
    Medium,
    Large,
}

impl BoardSize {
    pub const MENU: &'static [&'static str] = &["1. 20x10", "2. 30x15", "3. 40x20"];

    /// Maps a menu keypress (`1`, `2` or `3`) to a preset.
    pub fn from_choice(byte: u8) -> Option<Self> {
        match byte {
            b'1' => Some(BoardSize::Small),
            b'2' => Some(BoardSize::Medium),
            b'3' => Some(BoardSize::Large),
            _ => None,
        }
    }

    pub fn dimensions(self) -> (TermInt, TermInt) {
        match self {
            BoardSize::Small => (20, 10),
            BoardSize::Medium => (30, 15),
            BoardSize::Large => (40, 20),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const MENU: &'static [&'static str] = &["1. Easy", "2. Medium", "3. Hard"];

    pub fn from_choice(byte: u8) -> Option<Self> {
        match byte {
            b'1' => Some(Difficulty::Easy),
            b'2' => Some(Difficulty::Medium),
            b'3' => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn tick_interval(self) -> Duration {
        let ms = match self {
            Difficulty::Easy => 500,
            Difficulty::Medium => 300,
            Difficulty::Hard => 150,
        };
        Duration::from_millis(ms)
    }

    pub fn food_count(self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{}", name)
    }
}
