//! Etrian Odyssey V skill records.
//!
//! The header is 80 bytes. Only the first 28 are understood; the remaining
//! thirteen words are kept as-is so an edit never disturbs them.

use std::io::{self, Read, Seek};

use serde::{Deserialize, Serialize};

use super::{SkillRecord, common_accessors};
use crate::data_section::DataSections;
use crate::enums::{InflictionStatus, ModifierStatus, ModifierType, TargetTeam, TargetType};
use crate::error::Result;
use crate::flags::{DamageElement, Disables, Element, TargetStatus, UsableLocation};
use crate::reader::LittleEndianReader;
use crate::schema::Game;

pub const EO5_UNKNOWN_WORDS: usize = 13;

crate::flag_set! {
    pub struct Eo5UseRequirements(u32): Eo5UseRequirement {
        Head = 0 => "head",
        Arms = 1 => "arms",
        Legs = 2 => "legs",
        Sword = 3 => "sword",
        Rapier = 4 => "rapier",
        Knife = 11 => "knife",
        Katana = 10 => "katana",
        Scythe = 5 => "scythe",
        Fist = 7 => "fist",
        Bow = 9 => "bow",
        Gun = 6 => "gun",
        Staff = 8 => "staff",
        Shield = 12 => "shield",
        Unarmed = 13 => "unarmed",
        AnyBind = 16 => "any_bind",
        FullyBound = 17 => "fully_bound",
    }
}

crate::flag_set! {
    pub struct Eo5SkillFlags(u32): Eo5SkillFlag {
        /// Fired from a full union gauge.
        UnionSkill = 1 => "union_skill",
        ClassSkill = 10 => "class_skill",
        CommonSkill = 12 => "common_skill",
        Passive = 13 => "passive",
        /// Learned through race rather than class.
        RaceSkill = 16 => "race_skill",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Eo5Skill {
    pub name: String,
    pub max_level: u8,
    pub skill_type: u16,
    pub use_requirements: Eo5UseRequirements,
    pub target_status: TargetStatus,
    pub target_type: TargetType,
    pub target_team: TargetTeam,
    pub usable_location: UsableLocation,
    pub modifier_status: ModifierStatus,
    pub modifier_type: ModifierType,
    pub modifier_element: Element,
    pub damage_element: DamageElement,
    pub infliction_status: InflictionStatus,
    pub associated_disables: Disables,
    pub skill_flags: Eo5SkillFlags,
    pub unknown_words: [u32; EO5_UNKNOWN_WORDS],
    pub data_sections: DataSections,
}

impl SkillRecord for Eo5Skill {
    const GAME: Game = Game::Eo5;

    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>, name: String) -> io::Result<Self> {
        let max_level = r.read_u8()?;
        r.skip(1)?;
        let skill_type = r.read_u16()?;
        let use_requirements = Eo5UseRequirements::from_raw(r.read_u32()?);
        let target_status = TargetStatus::from_raw(r.read_u16()?);
        let target_type = TargetType::from_raw(r.read_u8()?);
        let target_team = TargetTeam::from_raw(r.read_u8()?);
        let usable_location = UsableLocation::from_raw(r.read_u16()?);
        let modifier_status = ModifierStatus::from_raw(r.read_u8()?);
        let modifier_type = ModifierType::from_raw(r.read_u8()?);
        let modifier_element = Element::from_raw(r.read_u16()?);
        let damage_element = DamageElement::from_raw(r.read_u16()?);
        let infliction_status = InflictionStatus::from_raw(r.read_u16()?);
        let associated_disables = Disables::from_raw(r.read_u16()?);
        let skill_flags = Eo5SkillFlags::from_raw(r.read_u32()?);
        let unknown_words = r.read_u32_array::<EO5_UNKNOWN_WORDS>()?;
        let data_sections = DataSections::parse(r, Self::GAME.section_shape())?;

        Ok(Self {
            name,
            max_level,
            skill_type,
            use_requirements,
            target_status,
            target_type,
            target_team,
            usable_location,
            modifier_status,
            modifier_type,
            modifier_element,
            damage_element,
            infliction_status,
            associated_disables,
            skill_flags,
            unknown_words,
            data_sections,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(self.max_level);
        out.push(0);
        out.extend_from_slice(&self.skill_type.to_le_bytes());
        out.extend_from_slice(&self.use_requirements.raw().to_le_bytes());
        out.extend_from_slice(&self.target_status.raw().to_le_bytes());
        out.push(self.target_type.raw());
        out.push(self.target_team.raw());
        out.extend_from_slice(&self.usable_location.raw().to_le_bytes());
        out.push(self.modifier_status.raw());
        out.push(self.modifier_type.raw());
        out.extend_from_slice(&self.modifier_element.raw().to_le_bytes());
        out.extend_from_slice(&self.damage_element.raw().to_le_bytes());
        out.extend_from_slice(&self.infliction_status.raw().to_le_bytes());
        out.extend_from_slice(&self.associated_disables.raw().to_le_bytes());
        out.extend_from_slice(&self.skill_flags.raw().to_le_bytes());
        for word in &self.unknown_words {
            out.extend_from_slice(&word.to_le_bytes());
        }
        self.data_sections
            .emit_to_vec(out, Self::GAME.section_shape())
    }

    common_accessors!();
}
