//! Etrian Odyssey III skill records.

use std::io::{self, Read, Seek};

use serde::{Deserialize, Serialize};

use super::{SkillRecord, common_accessors, narrow_u8};
use crate::data_section::DataSections;
use crate::enums::{InflictionStatus, ModifierStatus, ModifierType, TargetTeam, TargetType};
use crate::error::Result;
use crate::flags::{DamageElement, Disables, Element, TargetStatus, UsableLocation};
use crate::reader::LittleEndianReader;
use crate::schema::Game;

crate::raw_enum! {
    /// Battle and field behaviours a skill can have in EO3.
    pub enum Eo3SkillType: u8 {
        /// Attack using the STR damage formula.
        StrAttack = 0x00,
        /// Attack using the TEC damage formula.
        TecAttack = 0x01,
        /// Passive checked when the user attacks.
        AttackPassive = 0x02,
        FixedHpRestore = 0x03,
        FixedTpRestore = 0x04,
        FixedCombinedRestore = 0x05,
        HpRestore = 0x06,
        TpRestore = 0x07,
        Unknown1 = 0x09,
        CuresAilmentOrBind = 0x0A,
        CuresAilmentOrBindDuplicate = 0x0B,
        Revive = 0x0D,
        DisableWithoutAttack = 0x0F,
        ModifierWithoutAttack = 0x10,
        /// The skill Discharge links to.
        DischargeLink = 0x11,
        Knighthood = 0x12,
        AttackElementModifier = 0x13,
        Charge = 0x15,
        /// Creates a clone of the user.
        NinpoDouble = 0x17,
        /// Creates an uncontrollable enmity dummy with the user's name.
        NinpoMirage = 0x18,
        Bot = 0x19,
        PoisonDamageLink = 0x1A,
        /// Delayed attack, as used by Cloudbuster.
        DelayedAttack = 0x1B,
        LinkOnTrigger = 0x1C,
        ConditionalSkill = 0x1D,
        Guard = 0x1E,
        Counter = 0x1F,
        WildlingSummon = 0x20,
        DismissSummon = 0x21,
        WeaponMastery = 0x22,
        Flee = 0x23,
        RegalRadiance = 0x24,
        /// Call Allies and Submerged Move.
        UnknownAffectsBattleEntities = 0x25,
        HpCannon = 0x26,
        MarshDive = 0x27,
        StrAttackDamagesTp = 0x28,
        /// Damage based on the last damage instance of the battle.
        AttackBasedOnLastDamageInstance = 0x2A,
        RuinCallerRegenerate = 0x2B,
        Cover = 0x2C,
        RedirectsDamageAgainstLowHpAllies = 0x2D,
        RecoverFromAilmentsAtEndOfTurn = 0x2E,
        Unknown2 = 0x2F,
        Unknown3 = 0x30,
        Bait = 0x31,
        Unknown4 = 0x32,
        ChanceToBlockSkill = 0x33,
        GatekeeperReassemble = 0x34,
        GatekeeperDisassemble = 0x35,
        UnknownSummon = 0x36,
        LayEgg = 0x37,
        UnknownChange = 0x38,
        ForcedRowSwitch = 0x39,
        RestoreTpIfBound = 0x3A,
        Unknown5 = 0x3D,
        Unknown6 = 0x3E,
        Unknown7 = 0x3F,
        Unknown8 = 0x40,
        Unknown9 = 0x41,
        Unknown10 = 0x42,
        // Field skills from here on.
        Chop = 0x43,
        Take = 0x44,
        Mine = 0x45,
        DangerModifier = 0x46,
        SetDangerToZero = 0x47,
        DamageTileReduction = 0x48,
        IgnoreDamageAndMudTiles = 0x49,
        RevealFoes = 0x4A,
        RevealFoesDuplicate = 0x4B,
        IncreasePreemptiveChance = 0x4C,
        AllGatherTypesUp = 0x4F,
        ReturnToTown = 0x50,
        PassTime = 0x52,
        UnknownCampMastery = 0x53,
    }
}

impl Default for Eo3SkillType {
    fn default() -> Self {
        Self::StrAttack
    }
}

crate::flag_set! {
    /// Body parts and equipment a skill needs, in the in-game menu order.
    pub struct Eo3UseRequirements(u16): Eo3UseRequirement {
        Head = 0 => "head",
        Arms = 1 => "arms",
        Legs = 2 => "legs",
        Sword = 5 => "sword",
        Rapier = 4 => "rapier",
        Spear = 8 => "spear",
        Knife = 13 => "knife",
        Katana = 12 => "katana",
        Crossbow = 11 => "crossbow",
        Club = 6 => "club",
        Gun = 10 => "gun",
        Tome = 3 => "tome",
        Shield = 7 => "shield",
        Unarmed = 9 => "unarmed",
        /// Usable only while the user has any bind.
        AnyBind = 14 => "any_bind",
        /// Usable only while the user is fully bound.
        FullyBound = 15 => "fully_bound",
    }
}

crate::flag_set! {
    pub struct Eo3SkillFlags(u32): Eo3SkillFlag {
        Unknown0 = 0 => "unknown0",
        LimitSkill = 1 => "limit_skill",
        Unknown2 = 2 => "unknown2",
        Unknown3 = 3 => "unknown3",
        Unknown4 = 4 => "unknown4",
        LinkSkill = 5 => "link_skill",
        Unknown6 = 6 => "unknown6",
        Unknown7 = 7 => "unknown7",
        Unknown8 = 8 => "unknown8",
        Unknown9 = 9 => "unknown9",
        /// Exclusive to one class.
        ClassSkill = 10 => "class_skill",
        Unknown11 = 11 => "unknown11",
        CommonSkill = 12 => "common_skill",
        Passive = 13 => "passive",
        Unknown14 = 14 => "unknown14",
        Unknown15 = 15 => "unknown15",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Eo3Skill {
    pub name: String,
    pub max_level: u8,
    pub skill_type: Eo3SkillType,
    pub use_requirements: Eo3UseRequirements,
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
    pub skill_flags: Eo3SkillFlags,
    pub data_sections: DataSections,
}

impl SkillRecord for Eo3Skill {
    const GAME: Game = Game::Eo3;

    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>, name: String) -> io::Result<Self> {
        let max_level = r.read_u8()?;
        let skill_type = Eo3SkillType::from_raw(r.read_u8()?);
        let use_requirements = Eo3UseRequirements::from_raw(r.read_u16()?);
        let target_status = TargetStatus::from_raw(r.read_u16()?);
        let target_type = TargetType::from_raw(r.read_u8()?);
        let target_team = TargetTeam::from_raw(r.read_u8()?);
        let usable_location = UsableLocation::from_raw(r.read_u8()? as u16);
        let modifier_status = ModifierStatus::from_raw(r.read_u8()?);
        let modifier_type = ModifierType::from_raw(r.read_u8()?);
        r.skip(1)?;
        let modifier_element = Element::from_raw(r.read_u16()?);
        let damage_element = DamageElement::from_raw(r.read_u16()?);
        let infliction_status = InflictionStatus::from_raw(r.read_u16()?);
        let associated_disables = Disables::from_raw(r.read_u16()?);
        let skill_flags = Eo3SkillFlags::from_raw(r.read_u32()?);
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
            data_sections,
        })
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) -> Result<()> {
        let usable_location = narrow_u8("usable_location", self.usable_location.raw())?;

        out.push(self.max_level);
        out.push(self.skill_type.raw());
        out.extend_from_slice(&self.use_requirements.raw().to_le_bytes());
        out.extend_from_slice(&self.target_status.raw().to_le_bytes());
        out.push(self.target_type.raw());
        out.push(self.target_team.raw());
        out.push(usable_location);
        out.push(self.modifier_status.raw());
        out.push(self.modifier_type.raw());
        out.push(0);
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
