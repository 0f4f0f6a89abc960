//! Skill records, one layout per game.
//!
//! Each game has its own record struct that reads and writes its exact byte
//! layout. [`Skill`] is the closed union of them, and [`SkillRecord`] is the
//! accessor surface they share so table-level code never needs to match on
//! the game.

pub mod eo2u;
pub mod eo3;
pub mod eo4;
pub mod eo5;
pub mod eon;
pub mod eou;

use std::io::{self, Cursor, Read, Seek};

use serde::{Deserializer, Serialize};

use crate::data_section::DataSections;
use crate::enums::{InflictionStatus, TargetTeam, TargetType};
use crate::error::{Result, SkillError};
use crate::flags::{DamageElement, Disables, Element, TargetStatus, UsableLocation};
use crate::reader::LittleEndianReader;
use crate::schema::Game;

pub use eo2u::{Eo2uSkill, Eo2uSkillFlags, Eo2uUseRequirements};
pub use eo3::{Eo3Skill, Eo3SkillFlags, Eo3SkillType, Eo3UseRequirements};
pub use eo4::{Eo4Skill, Eo4SkillFlags, Eo4UseRequirements};
pub use eo5::{Eo5Skill, Eo5SkillFlags, Eo5UseRequirements};
pub use eon::{EonSkill, EonSkillFlags, EonUseRequirements};
pub use eou::{EouSkill, EouSkillFlags, EouUseRequirements};

/// Fields every game's skill record has, plus its binary codec.
pub trait SkillRecord: Sized {
    const GAME: Game;

    /// Read one record. The name is not stored in the table and is supplied
    /// from the name list.
    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>, name: String) -> io::Result<Self>;

    /// Append exactly `Self::GAME.record_len()` bytes.
    fn emit_to_vec(&self, out: &mut Vec<u8>) -> Result<()>;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
    fn max_level(&self) -> u8;
    fn target_status(&self) -> TargetStatus;
    fn target_type(&self) -> TargetType;
    fn target_team(&self) -> TargetTeam;
    fn usable_location(&self) -> UsableLocation;
    fn modifier_element(&self) -> Element;
    fn damage_element(&self) -> DamageElement;
    fn infliction_status(&self) -> InflictionStatus;
    fn associated_disables(&self) -> Disables;
    fn data_sections(&self) -> &DataSections;
    fn data_sections_mut(&mut self) -> &mut DataSections;
}

/// Implements the field accessors of [`SkillRecord`] for a record struct
/// that uses the shared field names.
macro_rules! common_accessors {
    () => {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
        }

        fn max_level(&self) -> u8 {
            self.max_level
        }

        fn target_status(&self) -> $crate::flags::TargetStatus {
            self.target_status
        }

        fn target_type(&self) -> $crate::enums::TargetType {
            self.target_type
        }

        fn target_team(&self) -> $crate::enums::TargetTeam {
            self.target_team
        }

        fn usable_location(&self) -> $crate::flags::UsableLocation {
            self.usable_location
        }

        fn modifier_element(&self) -> $crate::flags::Element {
            self.modifier_element
        }

        fn damage_element(&self) -> $crate::flags::DamageElement {
            self.damage_element
        }

        fn infliction_status(&self) -> $crate::enums::InflictionStatus {
            self.infliction_status
        }

        fn associated_disables(&self) -> $crate::flags::Disables {
            self.associated_disables
        }

        fn data_sections(&self) -> &$crate::data_section::DataSections {
            &self.data_sections
        }

        fn data_sections_mut(&mut self) -> &mut $crate::data_section::DataSections {
            &mut self.data_sections
        }
    };
}
pub(crate) use common_accessors;

/// Narrow a 16-bit flag set to its one-byte on-disk width.
pub(crate) fn narrow_u8(field: &'static str, value: u16) -> Result<u8> {
    u8::try_from(value).map_err(|_| SkillError::FieldOverflow {
        field,
        value: value as u64,
        width: 1,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Skill {
    Eo3(Eo3Skill),
    Eo4(Eo4Skill),
    Eou(EouSkill),
    Eo2u(Eo2uSkill),
    Eo5(Eo5Skill),
    Eon(EonSkill),
}

macro_rules! dispatch {
    ($skill:expr, $inner:ident => $body:expr) => {
        match $skill {
            Skill::Eo3($inner) => $body,
            Skill::Eo4($inner) => $body,
            Skill::Eou($inner) => $body,
            Skill::Eo2u($inner) => $body,
            Skill::Eo5($inner) => $body,
            Skill::Eon($inner) => $body,
        }
    };
}

impl Skill {
    /// Decode one record from the front of `bytes`, which must hold at least
    /// `game.record_len()` bytes. Exactly that many are consumed.
    pub fn decode(game: Game, bytes: &[u8], name: impl Into<String>) -> Result<Self> {
        let record_len = game.record_len();
        if bytes.len() < record_len {
            return Err(SkillError::ShortRecord {
                needed: record_len,
                available: bytes.len(),
            });
        }

        let mut r = LittleEndianReader::new(Cursor::new(&bytes[..record_len]));
        let name = name.into();
        let skill = match game {
            Game::Eo3 => Skill::Eo3(Eo3Skill::parse(&mut r, name)?),
            Game::Eo4 => Skill::Eo4(Eo4Skill::parse(&mut r, name)?),
            Game::Eou => Skill::Eou(EouSkill::parse(&mut r, name)?),
            Game::Eo2u => Skill::Eo2u(Eo2uSkill::parse(&mut r, name)?),
            Game::Eo5 => Skill::Eo5(Eo5Skill::parse(&mut r, name)?),
            Game::Eon => Skill::Eon(EonSkill::parse(&mut r, name)?),
        };

        let consumed = r.position()? as usize;
        if consumed != record_len {
            return Err(SkillError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{game} record decode consumed {consumed} bytes, expected {record_len}"),
            )));
        }

        Ok(skill)
    }

    /// Encode to exactly `self.game().record_len()` bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.game().record_len());
        self.emit_to_vec(&mut out)?;
        Ok(out)
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        dispatch!(self, s => s.emit_to_vec(out))?;

        let written = out.len() - start;
        let record_len = self.game().record_len();
        if written != record_len {
            out.truncate(start);
            return Err(SkillError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} record encode wrote {written} bytes, expected {record_len}",
                    self.game()
                ),
            )));
        }
        Ok(())
    }

    /// Read a record of `game` from its exchange-format representation.
    pub fn deserialize_for<'de, D>(game: Game, deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::Deserialize;

        Ok(match game {
            Game::Eo3 => Skill::Eo3(Eo3Skill::deserialize(deserializer)?),
            Game::Eo4 => Skill::Eo4(Eo4Skill::deserialize(deserializer)?),
            Game::Eou => Skill::Eou(EouSkill::deserialize(deserializer)?),
            Game::Eo2u => Skill::Eo2u(Eo2uSkill::deserialize(deserializer)?),
            Game::Eo5 => Skill::Eo5(Eo5Skill::deserialize(deserializer)?),
            Game::Eon => Skill::Eon(EonSkill::deserialize(deserializer)?),
        })
    }

    pub fn game(&self) -> Game {
        match self {
            Skill::Eo3(_) => Game::Eo3,
            Skill::Eo4(_) => Game::Eo4,
            Skill::Eou(_) => Game::Eou,
            Skill::Eo2u(_) => Game::Eo2u,
            Skill::Eo5(_) => Game::Eo5,
            Skill::Eon(_) => Game::Eon,
        }
    }

    pub fn name(&self) -> &str {
        dispatch!(self, s => s.name())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        dispatch!(self, s => s.set_name(name))
    }

    pub fn max_level(&self) -> u8 {
        dispatch!(self, s => s.max_level())
    }

    pub fn target_status(&self) -> TargetStatus {
        dispatch!(self, s => s.target_status())
    }

    pub fn target_type(&self) -> TargetType {
        dispatch!(self, s => s.target_type())
    }

    pub fn target_team(&self) -> TargetTeam {
        dispatch!(self, s => s.target_team())
    }

    pub fn usable_location(&self) -> UsableLocation {
        dispatch!(self, s => s.usable_location())
    }

    pub fn modifier_element(&self) -> Element {
        dispatch!(self, s => s.modifier_element())
    }

    pub fn damage_element(&self) -> DamageElement {
        dispatch!(self, s => s.damage_element())
    }

    pub fn infliction_status(&self) -> InflictionStatus {
        dispatch!(self, s => s.infliction_status())
    }

    pub fn associated_disables(&self) -> Disables {
        dispatch!(self, s => s.associated_disables())
    }

    pub fn data_sections(&self) -> &DataSections {
        dispatch!(self, s => s.data_sections())
    }

    pub fn data_sections_mut(&mut self) -> &mut DataSections {
        dispatch!(self, s => s.data_sections_mut())
    }
}

impl From<Eo3Skill> for Skill {
    fn from(skill: Eo3Skill) -> Self {
        Skill::Eo3(skill)
    }
}

impl From<Eo4Skill> for Skill {
    fn from(skill: Eo4Skill) -> Self {
        Skill::Eo4(skill)
    }
}

impl From<EouSkill> for Skill {
    fn from(skill: EouSkill) -> Self {
        Skill::Eou(skill)
    }
}

impl From<Eo2uSkill> for Skill {
    fn from(skill: Eo2uSkill) -> Self {
        Skill::Eo2u(skill)
    }
}

impl From<Eo5Skill> for Skill {
    fn from(skill: Eo5Skill) -> Self {
        Skill::Eo5(skill)
    }
}

impl From<EonSkill> for Skill {
    fn from(skill: EonSkill) -> Self {
        Skill::Eon(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_section::DataSection;

    fn full_sections(game: Game, count: usize) -> DataSections {
        let shape = game.section_shape();
        DataSections::from(
            (0..count)
                .map(|i| {
                    let kind = i as i32 + 1;
                    let values = (0..shape.values_per_section as i32)
                        .map(|lvl| kind * 100 + lvl)
                        .collect();
                    DataSection::new(kind, values)
                })
                .collect::<Vec<_>>(),
        )
    }

    fn sample(game: Game) -> Skill {
        let mut skill = match game {
            Game::Eo3 => Skill::from(Eo3Skill::default()),
            Game::Eo4 => Skill::from(Eo4Skill::default()),
            Game::Eou => Skill::from(EouSkill::default()),
            Game::Eo2u => Skill::from(Eo2uSkill::default()),
            Game::Eo5 => Skill::from(Eo5Skill::default()),
            Game::Eon => Skill::from(EonSkill::default()),
        };
        skill.set_name("Sample");
        skill
    }

    #[test]
    fn encoded_length_is_fixed_for_any_section_count() {
        for game in Game::ALL {
            for count in 0..=game.section_shape().slots {
                let mut skill = sample(game);
                *skill.data_sections_mut() = full_sections(game, count);
                let bytes = skill.encode().unwrap();
                assert_eq!(bytes.len(), game.record_len(), "{game} with {count} sections");

                let back = Skill::decode(game, &bytes, "Sample").unwrap();
                assert_eq!(back, skill, "{game} with {count} sections");
            }
        }
    }

    #[test]
    fn header_fields_fill_the_header() {
        for game in Game::ALL {
            let mut skill = sample(game);
            *skill.data_sections_mut() = full_sections(game, 1);
            let bytes = skill.encode().unwrap();
            let header_len = game.schema().header_len();
            assert_eq!(
                &bytes[header_len..header_len + 4],
                &1i32.to_le_bytes(),
                "{game}"
            );
        }
    }

    #[test]
    fn decode_rejects_short_input() {
        for game in Game::ALL {
            let bytes = vec![0u8; game.record_len() - 1];
            let err = Skill::decode(game, &bytes, "x").unwrap_err();
            assert!(matches!(err, SkillError::ShortRecord { .. }), "{game}");
        }
    }

    #[test]
    fn decode_ignores_bytes_past_the_record() {
        let game = Game::Eo4;
        let mut bytes = sample(game).encode().unwrap();
        bytes.extend_from_slice(&[0xff; 16]);
        let skill = Skill::decode(game, &bytes, "Sample").unwrap();
        assert_eq!(skill, sample(game));
    }

    #[test]
    fn dummy_level_games_store_ten_values() {
        for game in [Game::Eo5, Game::Eon] {
            let mut skill = sample(game);
            *skill.data_sections_mut() = full_sections(game, 1);
            assert_eq!(skill.data_sections().get(0).unwrap().values.len(), 10);
            skill.encode().unwrap();

            skill.data_sections_mut().push(DataSection::new(7, vec![0; 11]));
            let err = skill.encode().unwrap_err();
            assert!(matches!(
                err,
                SkillError::SectionLength {
                    kind: 7,
                    expected: 10,
                    actual: 11
                }
            ));
        }
    }
}
