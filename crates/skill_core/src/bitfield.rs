//! Fixed-width integers viewed as sequences of boolean flags.
//!
//! [`Bitfield`] is the storage; the [`flag_set!`](crate::flag_set) macro
//! builds a named flag set on top of it from a `(name, bit)` table, so the
//! bit meaning of every set is written down once as data.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserializer, Serializer};

/// Key used in the exchange format for set bits that have no name.
pub const UNMAPPED_BITS_KEY: &str = "unmapped_bits";

/// Unsigned integer types that can back a [`Bitfield`].
pub trait RawBits: Copy + Default + Eq + fmt::Debug {
    const BITS: u32;

    fn to_u32(self) -> u32;

    /// Truncates to the low `BITS` bits.
    fn from_u32_truncating(value: u32) -> Self;
}

impl RawBits for u8 {
    const BITS: u32 = 8;

    fn to_u32(self) -> u32 {
        self as u32
    }

    fn from_u32_truncating(value: u32) -> Self {
        value as u8
    }
}

impl RawBits for u16 {
    const BITS: u32 = 16;

    fn to_u32(self) -> u32 {
        self as u32
    }

    fn from_u32_truncating(value: u32) -> Self {
        value as u16
    }
}

impl RawBits for u32 {
    const BITS: u32 = 32;

    fn to_u32(self) -> u32 {
        self
    }

    fn from_u32_truncating(value: u32) -> Self {
        value
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitfield<T> {
    raw: T,
}

impl<T: RawBits> Bitfield<T> {
    pub const WIDTH: u32 = T::BITS;

    pub fn new(raw: T) -> Self {
        Self { raw }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Panics if `bit` is outside the container width.
    pub fn get(&self, bit: u32) -> bool {
        assert!(bit < T::BITS, "bit {bit} out of range for {}-bit field", T::BITS);
        (self.raw.to_u32() >> bit) & 1 == 1
    }

    /// Panics if `bit` is outside the container width.
    pub fn set(&mut self, bit: u32, value: bool) {
        assert!(bit < T::BITS, "bit {bit} out of range for {}-bit field", T::BITS);
        let mask = 1u32 << bit;
        let raw = if value {
            self.raw.to_u32() | mask
        } else {
            self.raw.to_u32() & !mask
        };
        self.raw = T::from_u32_truncating(raw);
    }

    pub fn raw(&self) -> T {
        self.raw
    }

    pub fn as_u32(&self) -> u32 {
        self.raw.to_u32()
    }

    /// Indices of every set bit, lowest first.
    pub fn set_bits(&self) -> impl Iterator<Item = u32> + '_ {
        (0..T::BITS).filter(move |&bit| self.get(bit))
    }
}

impl<T: RawBits> fmt::Debug for Bitfield<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = (T::BITS / 4) as usize;
        write!(f, "Bitfield({:#0width$x})", self.raw.to_u32(), width = digits + 2)
    }
}

/// Mask of every bit that has a name in `names`.
pub fn named_mask(names: &[(&str, u32)]) -> u32 {
    names.iter().fold(0u32, |mask, &(_, bit)| mask | (1u32 << bit))
}

/// Write a bitfield as a map of `name: bool`, in table order, followed by
/// `unmapped_bits` when any unnamed bit is set.
pub fn serialize_named<S, T>(
    bits: &Bitfield<T>,
    names: &'static [(&'static str, u32)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: RawBits,
{
    let unmapped = bits.as_u32() & !named_mask(names);
    let len = names.len() + usize::from(unmapped != 0);
    let mut map = serializer.serialize_map(Some(len))?;
    for &(name, bit) in names {
        map.serialize_entry(name, &bits.get(bit))?;
    }
    if unmapped != 0 {
        map.serialize_entry(UNMAPPED_BITS_KEY, &unmapped)?;
    }
    map.end()
}

/// Read a map written by [`serialize_named`]. Every named flag is required,
/// unknown keys are rejected, and `unmapped_bits` may not overlap named bits
/// or exceed the container width.
pub fn deserialize_named<'de, D, T>(
    deserializer: D,
    type_name: &'static str,
    names: &'static [(&'static str, u32)],
) -> Result<Bitfield<T>, D::Error>
where
    D: Deserializer<'de>,
    T: RawBits,
{
    deserializer.deserialize_map(NamedFlagsVisitor {
        type_name,
        names,
        marker: PhantomData,
    })
}

struct NamedFlagsVisitor<T> {
    type_name: &'static str,
    names: &'static [(&'static str, u32)],
    marker: PhantomData<T>,
}

impl<'de, T: RawBits> Visitor<'de> for NamedFlagsVisitor<T> {
    type Value = Bitfield<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} flag map", self.type_name)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut bits = Bitfield::<T>::zero();
        let mut seen = vec![false; self.names.len()];
        let mut unmapped: Option<u64> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == UNMAPPED_BITS_KEY {
                if unmapped.is_some() {
                    return Err(de::Error::duplicate_field(UNMAPPED_BITS_KEY));
                }
                unmapped = Some(map.next_value()?);
                continue;
            }

            let Some(slot) = self.names.iter().position(|&(name, _)| name == key) else {
                let expected: Vec<&str> = self.names.iter().map(|&(name, _)| name).collect();
                return Err(de::Error::custom(format!(
                    "unknown field `{key}` in {}, expected one of {}",
                    self.type_name,
                    expected.join(", ")
                )));
            };
            if seen[slot] {
                return Err(de::Error::duplicate_field(self.names[slot].0));
            }
            seen[slot] = true;
            let value: bool = map.next_value()?;
            bits.set(self.names[slot].1, value);
        }

        if let Some(slot) = seen.iter().position(|&present| !present) {
            return Err(de::Error::missing_field(self.names[slot].0));
        }

        if let Some(extra) = unmapped {
            let width_mask = if T::BITS == 32 {
                u32::MAX as u64
            } else {
                (1u64 << T::BITS) - 1
            };
            if extra & !width_mask != 0 {
                return Err(de::Error::custom(format!(
                    "{UNMAPPED_BITS_KEY} {extra:#x} does not fit in {} bits of {}",
                    T::BITS,
                    self.type_name
                )));
            }
            let extra = extra as u32;
            if extra & named_mask(self.names) != 0 {
                return Err(de::Error::custom(format!(
                    "{UNMAPPED_BITS_KEY} {extra:#x} overlaps named flags of {}",
                    self.type_name
                )));
            }
            bits = Bitfield::new(T::from_u32_truncating(bits.as_u32() | extra));
        }

        Ok(bits)
    }
}

/// Declare a named flag set over a [`Bitfield`].
///
/// ```ignore
/// flag_set! {
///     /// Where the skill can be used.
///     pub struct UsableLocation(u16): UsableLocationFlag {
///         Town = 0 => "town",
///         Dungeon = 1 => "dungeon",
///     }
/// }
/// ```
///
/// Generates the container type, a flag enum usable with `get`/`set`, and
/// serde impls that expose the flags by name. Flags serialize in the order
/// they are declared, which does not need to match bit order.
#[macro_export]
macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($raw:ty): $flag:ident {
            $(
                $(#[$fmeta:meta])*
                $variant:ident = $bit:literal => $key:literal
            ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $flag {
            $(
                $(#[$fmeta])*
                $variant,
            )*
        }

        impl $flag {
            pub const ALL: &'static [$flag] = &[$($flag::$variant),*];

            pub const fn bit(self) -> u32 {
                match self {
                    $($flag::$variant => $bit,)*
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $($flag::$variant => $key,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($key => Some($flag::$variant),)*
                    _ => None,
                }
            }
        }

        const _: () = {
            $(
                assert!($bit < <$raw as $crate::bitfield::RawBits>::BITS);
            )*
        };

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name($crate::bitfield::Bitfield<$raw>);

        impl $name {
            pub const NAMED_BITS: &'static [(&'static str, u32)] = &[$(($key, $bit)),*];

            pub fn from_raw(raw: $raw) -> Self {
                Self($crate::bitfield::Bitfield::new(raw))
            }

            pub fn raw(&self) -> $raw {
                self.0.raw()
            }

            pub fn get(&self, flag: $flag) -> bool {
                self.0.get(flag.bit())
            }

            pub fn set(&mut self, flag: $flag, value: bool) {
                self.0.set(flag.bit(), value)
            }

            pub fn with(mut self, flag: $flag) -> Self {
                self.set(flag, true);
                self
            }

            pub fn bits(&self) -> &$crate::bitfield::Bitfield<$raw> {
                &self.0
            }

            pub fn bits_mut(&mut self) -> &mut $crate::bitfield::Bitfield<$raw> {
                &mut self.0
            }

            /// Set bits that have no flag name.
            pub fn unmapped(&self) -> u32 {
                self.0.as_u32() & !$crate::bitfield::named_mask(Self::NAMED_BITS)
            }

            /// Names of every set flag, in declaration order.
            pub fn active(&self) -> impl Iterator<Item = $flag> + '_ {
                $flag::ALL.iter().copied().filter(move |flag| self.get(*flag))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                $crate::bitfield::serialize_named(&self.0, Self::NAMED_BITS, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                $crate::bitfield::deserialize_named(deserializer, stringify!($name), Self::NAMED_BITS)
                    .map(Self)
            }
        }
    };
}


#[cfg(test)]
mod crate_result_in_scope {
    #[allow(unused_imports)]
    use crate::error::Result;

    crate::flag_set! {
        pub struct Gate(u8): GateFlag {
            Open = 0 => "open",
        }
    }

    crate::raw_enum! {
        pub enum Mode: u8 {
            Idle = 0,
        }
    }

    #[test]
    fn macros_expand_beside_the_crate_result_alias() {
        let json = serde_json::to_string(&(Gate::default().with(GateFlag::Open), Mode::Idle))
            .unwrap();
        assert_eq!(json, r#"[{"open":true},"Idle"]"#);

        let (gate, mode): (Gate, Mode) = serde_json::from_str(r#"[{"open":false},3]"#).unwrap();
        assert_eq!(gate.raw(), 0);
        assert_eq!(mode, Mode::Unknown(3));
    }
}
