//! Flag sets shared by every game. Per-game sets (use requirements, skill
//! flags) live next to their game's record in [`crate::skill`].

crate::flag_set! {
    /// Requirements a target must meet to be selectable.
    pub struct TargetStatus(u16): TargetStatusFlag {
        /// Targets only dead allies.
        Dead = 0 => "dead",
        /// Targets only enemies that had a disable inflicted on them this turn.
        InflictedEnemies = 1 => "inflicted_enemies",
        Unknown1 = 2 => "unknown1",
        /// Targets only entities with buffs.
        HasBuff = 4 => "has_buff",
        /// Targeting ignores death and allows use on any entity.
        IgnoreDeath = 15 => "ignore_death",
    }
}

crate::flag_set! {
    /// Where the skill can be used.
    pub struct UsableLocation(u16): UsableLocationFlag {
        Town = 0 => "town",
        Dungeon = 1 => "dungeon",
        Battle = 2 => "battle",
    }
}

crate::flag_set! {
    /// Elements a modifier applies to.
    pub struct Element(u16): ElementFlag {
        Cut = 0 => "cut",
        Bash = 1 => "bash",
        Stab = 2 => "stab",
        Fire = 3 => "fire",
        Ice = 4 => "ice",
        Volt = 5 => "volt",
        Almighty = 6 => "almighty",
        Unknown1 = 7 => "unknown1",
        Unknown2 = 8 => "unknown2",
    }
}

crate::flag_set! {
    /// Damage type of an attack: the elements plus the "no penalty" flag.
    pub struct DamageElement(u16): DamageElementFlag {
        Cut = 0 => "cut",
        Bash = 1 => "bash",
        Stab = 2 => "stab",
        Fire = 3 => "fire",
        Ice = 4 => "ice",
        Volt = 5 => "volt",
        Almighty = 6 => "almighty",
        Unknown1 = 7 => "unknown1",
        Unknown2 = 8 => "unknown2",
        /// Skips the range penalty, the arm bind penalty and the sleep bonus.
        NoPenalty = 14 => "no_penalty",
    }
}

crate::flag_set! {
    /// Ailments and binds a skill inflicts, cures or otherwise handles.
    pub struct Disables(u16): DisableFlag {
        Death = 0 => "death",
        Petrification = 1 => "petrification",
        Sleep = 2 => "sleep",
        Panic = 3 => "panic",
        Plague = 4 => "plague",
        Poison = 5 => "poison",
        Blind = 6 => "blind",
        Curse = 7 => "curse",
        Paralysis = 8 => "paralysis",
        Stun = 9 => "stun",
        HeadBind = 10 => "head_bind",
        ArmBind = 11 => "arm_bind",
        LegBind = 12 => "leg_bind",
        Fear = 13 => "fear",
    }
}
