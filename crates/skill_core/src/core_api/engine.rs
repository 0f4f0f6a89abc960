use crate::error::SkillError;
use crate::layout::TableLayout;
use crate::name_table::NameTable;
use crate::schema::Game;
use crate::skill::Skill;
use crate::table::SkillTable;

use super::error::CoreError;
use super::types::Summary;

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// An opened skill table.
#[derive(Debug, Clone)]
pub struct Session {
    table: SkillTable,
    /// Slot occupancy of the bytes the table was opened from, if any.
    source_layout: Option<TableLayout>,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Decode a table and pair it with the text of its name list.
    pub fn open_table<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        names_text: &str,
        game: Game,
    ) -> Result<Session, CoreError> {
        let names = NameTable::parse(names_text);
        let table = SkillTable::decode(bytes.as_ref(), &names, game)?;
        let source_layout = TableLayout::scan(bytes.as_ref(), game)?;
        Ok(Session {
            table,
            source_layout: Some(source_layout),
        })
    }

    /// Decode a table with no name list; every record gets an empty name.
    pub fn open_table_unnamed<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        game: Game,
    ) -> Result<Session, CoreError> {
        let table = SkillTable::decode_unnamed(bytes.as_ref(), game)?;
        let source_layout = TableLayout::scan(bytes.as_ref(), game)?;
        Ok(Session {
            table,
            source_layout: Some(source_layout),
        })
    }

    /// Start from records already in memory, such as ones read from a
    /// JSON document.
    pub fn open_records(&self, game: Game, skills: Vec<Skill>) -> Result<Session, CoreError> {
        let table = SkillTable::new(game, skills)?;
        Ok(Session {
            table,
            source_layout: None,
        })
    }
}

impl Session {
    pub fn game(&self) -> Game {
        self.table.game()
    }

    pub fn table(&self) -> &SkillTable {
        &self.table
    }

    pub fn into_table(self) -> SkillTable {
        self.table
    }

    pub fn summary(&self) -> Summary {
        let game = self.table.game();
        let mut section_count_histogram = vec![0; game.section_shape().slots + 1];
        for skill in &self.table {
            let used = skill.data_sections().len().min(section_count_histogram.len() - 1);
            section_count_histogram[used] += 1;
        }

        Summary {
            game,
            record_count: self.table.len(),
            record_len: game.record_len(),
            section_count_histogram,
        }
    }

    /// Replace every record name from the text of an edited name list.
    pub fn apply_names(&mut self, names_text: &str) -> Result<(), CoreError> {
        self.table.apply_names(&NameTable::parse(names_text))?;
        Ok(())
    }

    /// Table bytes and the paired name list text.
    pub fn encode(&self) -> Result<(Vec<u8>, String), CoreError> {
        let (bytes, names) = self.table.encode()?;
        Ok((bytes, names.to_text()))
    }

    /// Byte map of the table this session was opened from. Sessions built
    /// from in-memory records map the bytes [`Self::encode`] would write.
    pub fn layout(&self) -> Result<TableLayout, CoreError> {
        let layout = self
            .source_layout
            .clone()
            .unwrap_or_else(|| self.table.layout());
        layout.validate().map_err(SkillError::from)?;
        Ok(layout)
    }
}
