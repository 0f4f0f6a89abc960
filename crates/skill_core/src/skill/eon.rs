//! Etrian Odyssey Nexus skill records. Same opening fields as EO5 with a
//! one-byte usable location and one more opaque word.

use std::io::{self, Read, Seek};

use serde::{Deserialize, Serialize};

use super::{SkillRecord, common_accessors, narrow_u8};
use crate::data_section::DataSections;
use crate::enums::{InflictionStatus, ModifierStatus, ModifierType, TargetTeam, TargetType};
use crate::error::Result;
use crate::flags::{DamageElement, Disables, Element, TargetStatus, UsableLocation};
use crate::reader::LittleEndianReader;
use crate::schema::Game;

pub const EON_UNKNOWN_WORDS: usize = 14;

crate::flag_set! {
    pub struct EonUseRequirements(u32): EonUseRequirement {
        Head = 0 => "head",
        Arms = 1 => "arms",
        Legs = 2 => "legs",
        Sword = 3 => "sword",
        Rapier = 4 => "rapier",
        Knife = 5 => "knife",
        Axe = 6 => "axe",
        Katana = 7 => "katana",
        Spear = 8 => "spear",
        Club = 9 => "club",
        Whip = 10 => "whip",
        Scythe = 11 => "scythe",
        Fist = 12 => "fist",
        Gun = 13 => "gun",
        Bow = 14 => "bow",
        Staff = 15 => "staff",
        DriveBlade = 16 => "drive_blade",
        Shield = 17 => "shield",
        Unarmed = 18 => "unarmed",
        AnyBind = 20 => "any_bind",
        FullyBound = 21 => "fully_bound",
    }
}

crate::flag_set! {
    pub struct EonSkillFlags(u32): EonSkillFlag {
        UnionSkill = 1 => "union_skill",
        ClassSkill = 10 => "class_skill",
        CommonSkill = 12 => "common_skill",
        Passive = 13 => "passive",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EonSkill {
    pub name: String,
    pub max_level: u8,
    pub skill_type: u16,
    pub use_requirements: EonUseRequirements,
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
    pub skill_flags: EonSkillFlags,
    pub unknown_words: [u32; EON_UNKNOWN_WORDS],
    pub data_sections: DataSections,
}

impl SkillRecord for EonSkill {
    const GAME: Game = Game::Eon;

    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>, name: String) -> io::Result<Self> {
        let max_level = r.read_u8()?;
        r.skip(1)?;
        let skill_type = r.read_u16()?;
        let use_requirements = EonUseRequirements::from_raw(r.read_u32()?);
        let target_status = TargetStatus::from_raw(r.read_u16()?);
        let target_type = TargetType::from_raw(r.read_u8()?);
        let target_team = TargetTeam::from_raw(r.read_u8()?);
        let usable_location = UsableLocation::from_raw(r.read_u8()? as u16);
        r.skip(1)?;
        let modifier_status = ModifierStatus::from_raw(r.read_u8()?);
        let modifier_type = ModifierType::from_raw(r.read_u8()?);
        let modifier_element = Element::from_raw(r.read_u16()?);
        let damage_element = DamageElement::from_raw(r.read_u16()?);
        let infliction_status = InflictionStatus::from_raw(r.read_u16()?);
        let associated_disables = Disables::from_raw(r.read_u16()?);
        let skill_flags = EonSkillFlags::from_raw(r.read_u32()?);
        let unknown_words = r.read_u32_array::<EON_UNKNOWN_WORDS>()?;
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
        let usable_location = narrow_u8("usable_location", self.usable_location.raw())?;

        out.push(self.max_level);
        out.push(0);
        out.extend_from_slice(&self.skill_type.to_le_bytes());
        out.extend_from_slice(&self.use_requirements.raw().to_le_bytes());
        out.extend_from_slice(&self.target_status.raw().to_le_bytes());
        out.push(self.target_type.raw());
        out.push(self.target_team.raw());
        out.push(usable_location);
        out.push(0);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_section::DataSection;
    use crate::skill::Skill;

    #[test]
    fn sections_start_after_the_opaque_words() {
        let skill = EonSkill {
            skill_type: 0x0123,
            unknown_words: [0xffff_ffff; EON_UNKNOWN_WORDS],
            data_sections: DataSections::from(vec![DataSection::new(-2, vec![9; 10])]),
            ..Default::default()
        };
        let bytes = Skill::from(skill.clone()).encode().unwrap();
        assert_eq!(bytes.len(), 0x264);
        assert_eq!(&bytes[2..4], &[0x23, 0x01]);
        assert!(bytes[28..84].iter().all(|&b| b == 0xff));
        assert_eq!(&bytes[84..88], &(-2i32).to_le_bytes());

        let back = Skill::decode(Game::Eon, &bytes, "").unwrap();
        assert_eq!(back, Skill::Eon(skill));
    }

    #[test]
    fn eleven_levels_with_one_implied() {
        let schema = Game::Eon.schema();
        assert_eq!(schema.number_of_levels, 11);
        assert_eq!(schema.values_per_section(), 10);
    }
}
