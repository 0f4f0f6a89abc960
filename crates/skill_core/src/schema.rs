use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_section::SectionShape;
use crate::error::SkillError;

/// The six skill table layouts, one per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    #[serde(rename = "EO3")]
    Eo3,
    #[serde(rename = "EO4")]
    Eo4,
    #[serde(rename = "EOU")]
    Eou,
    #[serde(rename = "EO2U")]
    Eo2u,
    #[serde(rename = "EO5")]
    Eo5,
    #[serde(rename = "EON")]
    Eon,
}

/// Whether a game's level count includes an implied "level 0" that shares
/// level 1's value and is therefore not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelConvention {
    NoDummyLevel,
    DummyLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSchema {
    pub game: Game,
    pub number_of_levels: usize,
    pub convention: LevelConvention,
    pub data_sections: usize,
    pub record_len: usize,
}

const SCHEMAS: [GameSchema; 6] = [
    GameSchema {
        game: Game::Eo3,
        number_of_levels: 10,
        convention: LevelConvention::NoDummyLevel,
        data_sections: 8,
        record_len: 0x178,
    },
    GameSchema {
        game: Game::Eo4,
        number_of_levels: 10,
        convention: LevelConvention::NoDummyLevel,
        data_sections: 8,
        record_len: 0x178,
    },
    // 10 base levels plus 5 boosted levels.
    GameSchema {
        game: Game::Eou,
        number_of_levels: 15,
        convention: LevelConvention::NoDummyLevel,
        data_sections: 10,
        record_len: 0x298,
    },
    // 10 base levels plus 10 grimoire levels.
    GameSchema {
        game: Game::Eo2u,
        number_of_levels: 20,
        convention: LevelConvention::NoDummyLevel,
        data_sections: 12,
        record_len: 0x408,
    },
    GameSchema {
        game: Game::Eo5,
        number_of_levels: 11,
        convention: LevelConvention::DummyLevel,
        data_sections: 12,
        record_len: 0x260,
    },
    GameSchema {
        game: Game::Eon,
        number_of_levels: 11,
        convention: LevelConvention::DummyLevel,
        data_sections: 12,
        record_len: 0x264,
    },
];

impl Game {
    pub const ALL: [Game; 6] = [
        Game::Eo3,
        Game::Eo4,
        Game::Eou,
        Game::Eo2u,
        Game::Eo5,
        Game::Eon,
    ];

    pub fn schema(self) -> &'static GameSchema {
        match self {
            Game::Eo3 => &SCHEMAS[0],
            Game::Eo4 => &SCHEMAS[1],
            Game::Eou => &SCHEMAS[2],
            Game::Eo2u => &SCHEMAS[3],
            Game::Eo5 => &SCHEMAS[4],
            Game::Eon => &SCHEMAS[5],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Game::Eo3 => "EO3",
            Game::Eo4 => "EO4",
            Game::Eou => "EOU",
            Game::Eo2u => "EO2U",
            Game::Eo5 => "EO5",
            Game::Eon => "EON",
        }
    }

    pub fn record_len(self) -> usize {
        self.schema().record_len
    }

    pub fn section_shape(self) -> SectionShape {
        self.schema().section_shape()
    }
}

impl GameSchema {
    /// Values stored per data section, after removing the dummy level.
    pub fn values_per_section(&self) -> usize {
        match self.convention {
            LevelConvention::NoDummyLevel => self.number_of_levels,
            LevelConvention::DummyLevel => self.number_of_levels - 1,
        }
    }

    pub fn section_shape(&self) -> SectionShape {
        SectionShape {
            slots: self.data_sections,
            values_per_section: self.values_per_section(),
        }
    }

    /// Bytes in front of the data section block.
    pub fn header_len(&self) -> usize {
        self.record_len - self.section_shape().byte_len()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Game::ALL
            .into_iter()
            .find(|game| game.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SkillError::UnsupportedGame(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_level_games_store_one_value_fewer() {
        let eo5 = Game::Eo5.schema();
        assert_eq!(eo5.number_of_levels, 11);
        assert_eq!(eo5.values_per_section(), 10);
        assert_eq!(Game::Eo2u.schema().values_per_section(), 20);
    }

    #[test]
    fn header_lengths_match_known_layouts() {
        let headers: Vec<usize> = Game::ALL
            .iter()
            .map(|game| game.schema().header_len())
            .collect();
        assert_eq!(headers, vec![24, 24, 24, 24, 80, 84]);
    }

    #[test]
    fn parses_game_names_case_insensitively() {
        assert_eq!("eo2u".parse::<Game>().unwrap(), Game::Eo2u);
        assert_eq!("EON".parse::<Game>().unwrap(), Game::Eon);
        let err = "EO6".parse::<Game>().unwrap_err();
        assert!(matches!(err, SkillError::UnsupportedGame(ref s) if s == "EO6"));
    }

    #[test]
    fn schema_lookup_is_keyed_by_game() {
        for game in Game::ALL {
            assert_eq!(game.schema().game, game);
        }
    }
}
