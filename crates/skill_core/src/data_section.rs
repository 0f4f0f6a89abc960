//! The leveled data at the tail of every skill record.
//!
//! A record ends in a fixed run of slots. Each slot holds a kind tag followed
//! by one value per stored level. A slot whose tag is zero is empty: it is
//! skipped when reading and never appears in [`DataSections`]. Writing emits
//! the present sections first, in their stored order, then zero-fills the
//! remaining slots. Slot positions are therefore only kept when the
//! collection is not reordered between reading and writing.

use std::io::{self, Read, Seek};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};
use crate::reader::LittleEndianReader;

const I32_WIDTH: usize = 4;

/// Slot count and stored values per slot for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionShape {
    pub slots: usize,
    pub values_per_section: usize,
}

impl SectionShape {
    /// Bytes taken by one slot: the tag plus its values.
    pub fn slot_len(&self) -> usize {
        I32_WIDTH * (self.values_per_section + 1)
    }

    /// Bytes taken by the whole slot run, independent of how many are used.
    pub fn byte_len(&self) -> usize {
        self.slots * self.slot_len()
    }
}

/// One function of a skill (damage, healing, duration...) across its levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSection {
    pub kind: i32,
    pub values: Vec<i32>,
}

impl DataSection {
    pub fn new(kind: i32, values: Vec<i32>) -> Self {
        Self { kind, values }
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>, values: usize) -> io::Result<Self> {
        let kind = r.read_i32()?;
        let values = r.read_i32_vec(values)?;
        Ok(Self { kind, values })
    }

    pub fn validate(&self, shape: SectionShape) -> Result<()> {
        if self.kind == 0 {
            return Err(SkillError::ReservedSectionKind);
        }
        if self.values.len() != shape.values_per_section {
            return Err(SkillError::SectionLength {
                kind: self.kind,
                expected: shape.values_per_section,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.kind.to_le_bytes());
        for value in &self.values {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSections(Vec<DataSection>);

impl DataSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `shape.slots` slots, keeping the non-empty ones in slot order.
    /// Always consumes exactly `shape.byte_len()` bytes.
    pub fn parse<R: Read + Seek>(
        r: &mut LittleEndianReader<R>,
        shape: SectionShape,
    ) -> io::Result<Self> {
        let mut sections = Vec::with_capacity(shape.slots);
        for _ in 0..shape.slots {
            let slot_start = r.position()?;
            let kind = r.read_i32()?;
            if kind == 0 {
                r.skip((I32_WIDTH * shape.values_per_section) as u64)?;
            } else {
                r.seek_to(slot_start)?;
                sections.push(DataSection::parse(r, shape.values_per_section)?);
            }
        }
        Ok(Self(sections))
    }

    pub fn validate(&self, shape: SectionShape) -> Result<()> {
        if self.0.len() > shape.slots {
            return Err(SkillError::TooManySections {
                count: self.0.len(),
                max: shape.slots,
            });
        }
        self.0.iter().try_for_each(|section| section.validate(shape))
    }

    /// Append exactly `shape.byte_len()` bytes: every section, then zeroed
    /// padding slots.
    pub fn emit_to_vec(&self, out: &mut Vec<u8>, shape: SectionShape) -> Result<()> {
        self.validate(shape)?;

        for section in &self.0 {
            section.emit_to_vec(out);
        }
        let empty_slots = shape.slots - self.0.len();
        out.resize(out.len() + empty_slots * shape.slot_len(), 0);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DataSection> {
        self.0.get(index)
    }

    pub fn push(&mut self, section: DataSection) {
        self.0.push(section);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataSection> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DataSection] {
        &self.0
    }

    pub fn kinds(&self) -> Vec<i32> {
        self.0.iter().map(|section| section.kind).collect()
    }
}

impl From<Vec<DataSection>> for DataSections {
    fn from(sections: Vec<DataSection>) -> Self {
        Self(sections)
    }
}

impl<'a> IntoIterator for &'a DataSections {
    type Item = &'a DataSection;
    type IntoIter = std::slice::Iter<'a, DataSection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const SHAPE: SectionShape = SectionShape {
        slots: 8,
        values_per_section: 10,
    };

    fn slot(kind: i32, base: i32) -> Vec<u8> {
        let mut out = Vec::new();
        DataSection::new(kind, (0..10).map(|lvl| base + lvl).collect()).emit_to_vec(&mut out);
        out
    }

    fn zero_slot() -> Vec<u8> {
        vec![0u8; SHAPE.slot_len()]
    }

    #[test]
    fn skips_empty_slots_in_any_position() {
        let mut bytes = Vec::new();
        bytes.extend(slot(1, 100));
        bytes.extend(zero_slot());
        bytes.extend(slot(5, 200));
        bytes.extend(slot(9, 300));
        for _ in 0..4 {
            bytes.extend(zero_slot());
        }
        assert_eq!(bytes.len(), SHAPE.byte_len());

        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        let sections = DataSections::parse(&mut r, SHAPE).unwrap();
        assert_eq!(r.position().unwrap(), SHAPE.byte_len() as u64);
        assert_eq!(sections.kinds(), vec![1, 5, 9]);
        assert_eq!(sections.get(1).unwrap().values[0], 200);

        let mut out = Vec::new();
        sections.emit_to_vec(&mut out, SHAPE).unwrap();
        assert_eq!(out.len(), SHAPE.byte_len());
        assert_eq!(&out[..SHAPE.slot_len()], slot(1, 100).as_slice());
        assert_eq!(
            &out[SHAPE.slot_len()..2 * SHAPE.slot_len()],
            slot(5, 200).as_slice()
        );
        assert_eq!(
            &out[2 * SHAPE.slot_len()..3 * SHAPE.slot_len()],
            slot(9, 300).as_slice()
        );
        assert!(out[3 * SHAPE.slot_len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn nonzero_values_in_an_empty_slot_are_dropped() {
        // A zero tag marks the slot empty whatever its payload holds.
        let mut bytes = slot(0, 7);
        for _ in 1..SHAPE.slots {
            bytes.extend(zero_slot());
        }
        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        let sections = DataSections::parse(&mut r, SHAPE).unwrap();
        assert!(sections.is_empty());
        assert_eq!(r.position().unwrap(), SHAPE.byte_len() as u64);
    }

    #[test]
    fn empty_collection_writes_all_padding() {
        let mut out = vec![0xaa];
        DataSections::new().emit_to_vec(&mut out, SHAPE).unwrap();
        assert_eq!(out.len(), 1 + SHAPE.byte_len());
        assert!(out[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn truncated_slot_run_is_an_error() {
        let bytes = slot(3, 0);
        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        assert!(DataSections::parse(&mut r, SHAPE).is_err());
    }

    #[test]
    fn rejects_wrong_value_count() {
        let sections = DataSections::from(vec![DataSection::new(4, vec![1; 9])]);
        let err = sections.emit_to_vec(&mut Vec::new(), SHAPE).unwrap_err();
        assert!(matches!(
            err,
            SkillError::SectionLength {
                kind: 4,
                expected: 10,
                actual: 9
            }
        ));
    }

    #[test]
    fn rejects_too_many_sections() {
        let sections =
            DataSections::from(vec![DataSection::new(1, vec![0; 10]); SHAPE.slots + 1]);
        let err = sections.emit_to_vec(&mut Vec::new(), SHAPE).unwrap_err();
        assert!(matches!(err, SkillError::TooManySections { count: 9, max: 8 }));
    }

    #[test]
    fn rejects_reserved_kind() {
        let sections = DataSections::from(vec![DataSection::new(0, vec![0; 10])]);
        let err = sections.emit_to_vec(&mut Vec::new(), SHAPE).unwrap_err();
        assert!(matches!(err, SkillError::ReservedSectionKind));
    }

    #[test]
    fn serializes_as_a_plain_list() {
        let sections = DataSections::from(vec![DataSection::new(2, vec![1, 2])]);
        let json = serde_json::to_string(&sections).unwrap();
        assert_eq!(json, r#"[{"kind":2,"values":[1,2]}]"#);
    }
}
