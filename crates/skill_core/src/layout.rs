use std::io::{self, Cursor};

use serde::Serialize;

use crate::error::{Result, SkillError};
use crate::reader::LittleEndianReader;
use crate::schema::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "region", rename_all = "snake_case")]
pub enum RegionId {
    Header { record: usize },
    Slot { record: usize, slot: usize },
}

impl RegionId {
    pub fn record(&self) -> usize {
        match *self {
            RegionId::Header { record } | RegionId::Slot { record, .. } => record,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionLayout {
    #[serde(flatten)]
    pub id: RegionId,
    pub range: ByteRange,
    /// Whether the slot holds a data section. Always true for headers.
    pub used: bool,
}

/// Byte map of an encoded table: each record's header followed by every one
/// of its section slots, used or not.
#[derive(Debug, Clone, Serialize)]
pub struct TableLayout {
    pub game: Game,
    pub table_len: usize,
    pub regions: Vec<RegionLayout>,
}

impl TableLayout {
    /// Build the layout for records whose section counts are `used_slots`,
    /// in table order. Sections are packed to the front, as encode writes
    /// them.
    pub fn build(game: Game, used_slots: impl IntoIterator<Item = usize>) -> Self {
        let used: Vec<usize> = used_slots.into_iter().collect();
        Self::from_occupancy(game, used.len(), |record, slot| slot < used[record])
    }

    /// Map `bytes` as they are, reading every slot tag so interior empty
    /// slots show where the file has them.
    pub fn scan(bytes: &[u8], game: Game) -> Result<Self> {
        let record_len = game.record_len();
        if bytes.len() % record_len != 0 {
            return Err(SkillError::TableLength {
                len: bytes.len(),
                record_len,
            });
        }

        let schema = game.schema();
        let shape = schema.section_shape();
        let header_len = schema.header_len();
        let records = bytes.len() / record_len;

        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        let mut occupied = Vec::with_capacity(records * shape.slots);
        for record in 0..records {
            for slot in 0..shape.slots {
                let tag_at = record * record_len + header_len + slot * shape.slot_len();
                r.seek_to(tag_at as u64)?;
                occupied.push(r.read_i32()? != 0);
            }
        }

        Ok(Self::from_occupancy(game, records, |record, slot| {
            occupied[record * shape.slots + slot]
        }))
    }

    fn from_occupancy(game: Game, records: usize, used: impl Fn(usize, usize) -> bool) -> Self {
        let schema = game.schema();
        let shape = schema.section_shape();
        let header_len = schema.header_len();

        let mut regions = Vec::with_capacity(records * (shape.slots + 1));
        let mut offset = 0usize;
        for record in 0..records {
            regions.push(RegionLayout {
                id: RegionId::Header { record },
                range: ByteRange::new(offset, header_len),
                used: true,
            });
            offset += header_len;

            for slot in 0..shape.slots {
                regions.push(RegionLayout {
                    id: RegionId::Slot { record, slot },
                    range: ByteRange::new(offset, shape.slot_len()),
                    used: used(record, slot),
                });
                offset += shape.slot_len();
            }
        }

        Self {
            game,
            table_len: offset,
            regions,
        }
    }

    pub fn record_count(&self) -> usize {
        self.regions
            .last()
            .map(|region| region.id.record() + 1)
            .unwrap_or(0)
    }

    pub fn record_range(&self, record: usize) -> Option<ByteRange> {
        let mut regions = self.regions.iter().filter(|r| r.id.record() == record);
        let first = regions.next()?;
        let end = regions.last().map(|r| r.range.end).unwrap_or(first.range.end);
        Some(ByteRange {
            start: first.range.start,
            end,
        })
    }

    pub fn validate(&self) -> io::Result<()> {
        let record_len = self.game.record_len();
        if self.table_len % record_len != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "table length {} is not a multiple of the {} record length {record_len}",
                    self.table_len, self.game
                ),
            ));
        }

        if self.regions.first().is_some_and(|first| first.range.start != 0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "layout does not start at byte 0",
            ));
        }

        let mut expected = 0usize;
        for region in &self.regions {
            if region.range.start != expected {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "layout gap/overlap around {:?}: expected start {}, got {}",
                        region.id, expected, region.range.start
                    ),
                ));
            }
            if region.range.end < region.range.start {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "invalid range for {:?}: {}..{}",
                        region.id, region.range.start, region.range.end
                    ),
                ));
            }
            expected = region.range.end;
        }

        if expected != self.table_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "layout does not cover table: ended at {}, table length {}",
                    expected, self.table_len
                ),
            ));
        }

        for record in 0..self.record_count() {
            let len = self.record_range(record).map(|r| r.len()).unwrap_or(0);
            if len != record_len {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("record {record} spans {len} bytes, expected {record_len}"),
                ));
            }
        }

        Ok(())
    }
}
