//! Single-value code fields (target type, infliction status...).
//!
//! Every code keeps values it has no name for as `Unknown(raw)`, the same way
//! [`crate::schema::Game`] parsing is strict but table contents are not: the
//! game data is authoritative, names are only a reading aid.

use std::fmt;

use serde::Deserializer;
use serde::de::{self, Visitor};

/// Declare a code enum over an unsigned integer with an `Unknown(raw)`
/// fallback. Named values serialize as their variant name, unknown values as
/// a bare integer; both forms are accepted when reading.
#[macro_export]
macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $raw:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            Unknown($raw),
        }

        impl $name {
            pub fn from_raw(raw: $raw) -> Self {
                match raw {
                    $($value => Self::$variant,)*
                    other => Self::Unknown(other),
                }
            }

            pub fn raw(self) -> $raw {
                match self {
                    $(Self::$variant => $value,)*
                    Self::Unknown(other) => other,
                }
            }

            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some(stringify!($variant)),)*
                    Self::Unknown(_) => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "Unknown ({:#x})", self.raw()),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                match self.name() {
                    Some(name) => serializer.serialize_str(name),
                    None => serializer.serialize_u64(self.raw() as u64),
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                $crate::enums::deserialize_code(
                    deserializer,
                    stringify!($name),
                    Self::from_name,
                    |value| <$raw>::try_from(value).ok().map(Self::from_raw),
                )
            }
        }
    };
}

/// Read a code written by a [`raw_enum!`] type: a variant name or an integer.
pub fn deserialize_code<'de, D, T>(
    deserializer: D,
    type_name: &'static str,
    from_name: fn(&str) -> Option<T>,
    from_int: fn(u64) -> Option<T>,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CodeVisitor {
        type_name,
        from_name,
        from_int,
    })
}

struct CodeVisitor<T> {
    type_name: &'static str,
    from_name: fn(&str) -> Option<T>,
    from_int: fn(u64) -> Option<T>,
}

impl<'de, T> Visitor<'de> for CodeVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} name or integer code", self.type_name)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        (self.from_name)(value)
            .ok_or_else(|| E::custom(format!("unknown {} name `{value}`", self.type_name)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        (self.from_int)(value)
            .ok_or_else(|| E::custom(format!("{} code {value} is out of range", self.type_name)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        let value = u64::try_from(value)
            .map_err(|_| E::custom(format!("{} code {value} is negative", self.type_name)))?;
        self.visit_u64(value)
    }
}

crate::raw_enum! {
    /// What entities a skill targets.
    pub enum TargetType: u8 {
        Single = 0x01,
        All = 0x02,
        MultiHitRandomTarget = 0x03,
        MultiHitOneTarget = 0x04,
        /// Targets only the user.
        User = 0x0A,
        Row = 0x10,
    }
}

crate::raw_enum! {
    /// Which side a skill targets.
    pub enum TargetTeam: u8 {
        Allies = 0x01,
        Enemies = 0x02,
        AllCombatants = 0x03,
    }
}

crate::raw_enum! {
    /// What a skill does with the disables in its disable set.
    pub enum InflictionStatus: u16 {
        None = 0x0,
        Inflicts = 0x1,
        Cures = 0x2,
        /// Spreads the target's disables to other enemies.
        SpreadsToEnemies = 0x3,
        /// Moves disables from the user to the target.
        Transfer = 0x4,
    }
}

crate::raw_enum! {
    /// Whether a skill applies, or purges, buffs and debuffs.
    pub enum ModifierStatus: u8 {
        None = 0x0,
        Buff = 0x1,
        Debuff = 0x2,
        PurgeBuffs = 0x3,
        PurgeDebuffs = 0x4,
    }
}

crate::raw_enum! {
    /// Modifier category. Only used to decide which buff overwrites which.
    pub enum ModifierType: u8 {
        None = 0x0,
        Attack = 0x1,
        Status = 0x2,
        Evasion = 0x3,
        AttackDefense = 0x4,
        Defense = 0x5,
        Regen = 0x6,
        Reduction = 0x7,
        MaximumHP = 0x8,
        Accuracy = 0x9,
        Enmity = 0xA,
    }
}

impl Default for TargetType {
    fn default() -> Self {
        Self::Single
    }
}

impl Default for TargetTeam {
    fn default() -> Self {
        Self::Allies
    }
}

impl Default for InflictionStatus {
    fn default() -> Self {
        Self::None
    }
}

impl Default for ModifierStatus {
    fn default() -> Self {
        Self::None
    }
}

impl Default for ModifierType {
    fn default() -> Self {
        Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_values() {
        assert_eq!(TargetType::from_raw(0x0A), TargetType::User);
        assert_eq!(TargetTeam::from_raw(3), TargetTeam::AllCombatants);
        assert_eq!(InflictionStatus::Transfer.raw(), 4);
    }

    #[test]
    fn preserves_unknown_values() {
        assert_eq!(TargetType::from_raw(0x7f), TargetType::Unknown(0x7f));
        assert_eq!(ModifierType::from_raw(0xff).raw(), 0xff);
        assert_eq!(TargetType::Unknown(0x7f).to_string(), "Unknown (0x7f)");
    }

    #[test]
    fn serializes_names_and_bare_codes() {
        let json = serde_json::to_string(&[TargetTeam::Enemies, TargetTeam::Unknown(9)]).unwrap();
        assert_eq!(json, r#"["Enemies",9]"#);

        let back: Vec<TargetTeam> = serde_json::from_str(r#"["Enemies",9,1]"#).unwrap();
        assert_eq!(
            back,
            vec![TargetTeam::Enemies, TargetTeam::Unknown(9), TargetTeam::Allies]
        );
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(serde_json::from_str::<TargetTeam>(r#""Nobody""#).is_err());
        assert!(serde_json::from_str::<TargetTeam>("256").is_err());
        assert!(serde_json::from_str::<TargetTeam>("-1").is_err());
        assert!(serde_json::from_str::<InflictionStatus>("256").is_ok());
    }
}
