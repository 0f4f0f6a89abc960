//! Etrian Odyssey 2 Untold skill records. Use requirements widen to 32 bits
//! and the modifier type byte is gone.

use std::io::{self, Read, Seek};

use serde::{Deserialize, Serialize};

use super::{SkillRecord, common_accessors, narrow_u8};
use crate::data_section::DataSections;
use crate::enums::{InflictionStatus, ModifierStatus, TargetTeam, TargetType};
use crate::error::Result;
use crate::flags::{DamageElement, Disables, Element, TargetStatus, UsableLocation};
use crate::reader::LittleEndianReader;
use crate::schema::Game;

crate::flag_set! {
    pub struct Eo2uUseRequirements(u32): Eo2uUseRequirement {
        Head = 0 => "head",
        Arms = 1 => "arms",
        Legs = 2 => "legs",
        Sword = 3 => "sword",
        Knife = 4 => "knife",
        Axe = 5 => "axe",
        Katana = 9 => "katana",
        Whip = 6 => "whip",
        Bow = 8 => "bow",
        Gun = 10 => "gun",
        Club = 11 => "club",
        Staff = 7 => "staff",
        Shield = 12 => "shield",
        Unarmed = 13 => "unarmed",
        AnyBind = 16 => "any_bind",
        FullyBound = 17 => "fully_bound",
    }
}

crate::flag_set! {
    pub struct Eo2uSkillFlags(u32): Eo2uSkillFlag {
        /// Force boost or force break.
        ForceSkill = 1 => "force_skill",
        LinkSkill = 5 => "link_skill",
        ClassSkill = 10 => "class_skill",
        CommonSkill = 12 => "common_skill",
        Passive = 13 => "passive",
        /// Granted by a grimoire stone rather than learned.
        GrimoireSkill = 16 => "grimoire_skill",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Eo2uSkill {
    pub name: String,
    pub max_level: u8,
    pub skill_type: u8,
    pub use_requirements: Eo2uUseRequirements,
    pub target_status: TargetStatus,
    pub target_type: TargetType,
    pub target_team: TargetTeam,
    pub usable_location: UsableLocation,
    pub modifier_status: ModifierStatus,
    pub modifier_element: Element,
    pub damage_element: DamageElement,
    pub infliction_status: InflictionStatus,
    pub associated_disables: Disables,
    pub skill_flags: Eo2uSkillFlags,
    pub data_sections: DataSections,
}

impl SkillRecord for Eo2uSkill {
    const GAME: Game = Game::Eo2u;

    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>, name: String) -> io::Result<Self> {
        let max_level = r.read_u8()?;
        let skill_type = r.read_u8()?;
        let use_requirements = Eo2uUseRequirements::from_raw(r.read_u32()?);
        let target_status = TargetStatus::from_raw(r.read_u16()?);
        let target_type = TargetType::from_raw(r.read_u8()?);
        let target_team = TargetTeam::from_raw(r.read_u8()?);
        let usable_location = UsableLocation::from_raw(r.read_u8()? as u16);
        let modifier_status = ModifierStatus::from_raw(r.read_u8()?);
        let modifier_element = Element::from_raw(r.read_u16()?);
        let damage_element = DamageElement::from_raw(r.read_u16()?);
        let infliction_status = InflictionStatus::from_raw(r.read_u16()?);
        let associated_disables = Disables::from_raw(r.read_u16()?);
        let skill_flags = Eo2uSkillFlags::from_raw(r.read_u32()?);
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
            modifier_element,
            damage_element,
            infliction_status,
            associated_disables,
            skill_flags,
            data_sections,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> Result<()> {
        let usable_location = narrow_u8("usable_location", self.usable_location.raw())?;

        out.push(self.max_level);
        out.push(self.skill_type);
        out.extend_from_slice(&self.use_requirements.raw().to_le_bytes());
        out.extend_from_slice(&self.target_status.raw().to_le_bytes());
        out.push(self.target_type.raw());
        out.push(self.target_team.raw());
        out.push(usable_location);
        out.push(self.modifier_status.raw());
        out.extend_from_slice(&self.modifier_element.raw().to_le_bytes());
        out.extend_from_slice(&self.damage_element.raw().to_le_bytes());
        out.extend_from_slice(&self.infliction_status.raw().to_le_bytes());
        out.extend_from_slice(&self.associated_disables.raw().to_le_bytes());
        out.extend_from_slice(&self.skill_flags.raw().to_le_bytes());
        self.data_sections
            .emit_to_vec(out, Self::GAME.section_shape())
    }

    common_accessors!();
}
