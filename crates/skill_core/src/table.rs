//! Whole skill tables: a run of fixed-length records plus the name list that
//! pairs with them by position.

use tracing::{debug, trace, warn};

use crate::error::{Result, SkillError};
use crate::layout::TableLayout;
use crate::name_table::NameTable;
use crate::schema::Game;
use crate::skill::Skill;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTable {
    game: Game,
    skills: Vec<Skill>,
}

impl SkillTable {
    /// Build a table from records, which must all belong to `game`.
    pub fn new(game: Game, skills: Vec<Skill>) -> Result<Self> {
        check_games(game, &skills)?;
        Ok(Self { game, skills })
    }

    /// Decode every record of `bytes`, naming record `i` with line `i` of
    /// `names`.
    pub fn decode(bytes: &[u8], names: &NameTable, game: Game) -> Result<Self> {
        let count = record_count(bytes, game)?;
        if names.len() < count {
            return Err(SkillError::MissingName { index: names.len() });
        }
        if names.len() > count {
            warn!(
                names = names.len(),
                records = count,
                "name list is longer than the table; extra names ignored"
            );
        }

        let skills = decode_records(bytes, game, |index| names.get(index).unwrap_or_default())?;
        debug!(%game, records = skills.len(), "decoded skill table");
        Ok(Self { game, skills })
    }

    /// Decode without a name list. Every record gets an empty name.
    pub fn decode_unnamed(bytes: &[u8], game: Game) -> Result<Self> {
        record_count(bytes, game)?;
        let skills = decode_records(bytes, game, |_| "")?;
        debug!(%game, records = skills.len(), "decoded unnamed skill table");
        Ok(Self { game, skills })
    }

    /// Encode every record in order, returning the table bytes and the name
    /// list that pairs with them.
    pub fn encode(&self) -> Result<(Vec<u8>, NameTable)> {
        check_games(self.game, &self.skills)?;
        let names = self.names();
        check_single_line(&names)?;

        let mut bytes = Vec::with_capacity(self.skills.len() * self.game.record_len());
        for (index, skill) in self.skills.iter().enumerate() {
            skill
                .emit_to_vec(&mut bytes)
                .map_err(|e| e.at_record(index))?;
            trace!(index, name = skill.name(), "encoded record");
        }

        debug!(game = %self.game, records = self.skills.len(), bytes = bytes.len(), "encoded skill table");
        Ok((bytes, names))
    }

    /// Rename every record from an edited name list of the same length.
    pub fn apply_names(&mut self, names: &NameTable) -> Result<()> {
        if names.len() != self.skills.len() {
            return Err(SkillError::NamePairing {
                names: names.len(),
                records: self.skills.len(),
            });
        }
        check_single_line(names)?;
        for (skill, name) in self.skills.iter_mut().zip(names.iter()) {
            skill.set_name(name);
        }
        Ok(())
    }

    pub fn names(&self) -> NameTable {
        self.skills
            .iter()
            .map(|skill| skill.name().to_string())
            .collect()
    }

    /// Byte map of the table as [`Self::encode`] would write it.
    pub fn layout(&self) -> TableLayout {
        TableLayout::build(
            self.game,
            self.skills.iter().map(|skill| skill.data_sections().len()),
        )
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut Vec<Skill> {
        &mut self.skills
    }

    pub fn get(&self, index: usize) -> Option<&Skill> {
        self.skills.get(index)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skill> {
        self.skills.iter()
    }

    pub fn into_skills(self) -> Vec<Skill> {
        self.skills
    }
}

impl<'a> IntoIterator for &'a SkillTable {
    type Item = &'a Skill;
    type IntoIter = std::slice::Iter<'a, Skill>;

    fn into_iter(self) -> Self::IntoIter {
        self.skills.iter()
    }
}

fn record_count(bytes: &[u8], game: Game) -> Result<usize> {
    let record_len = game.record_len();
    if bytes.len() % record_len != 0 {
        return Err(SkillError::TableLength {
            len: bytes.len(),
            record_len,
        });
    }
    Ok(bytes.len() / record_len)
}

fn decode_records<'n>(
    bytes: &[u8],
    game: Game,
    name_of: impl Fn(usize) -> &'n str,
) -> Result<Vec<Skill>> {
    bytes
        .chunks_exact(game.record_len())
        .enumerate()
        .map(|(index, chunk)| {
            let skill = Skill::decode(game, chunk, name_of(index)).map_err(|e| e.at_record(index))?;
            trace!(
                index,
                name = skill.name(),
                sections = skill.data_sections().len(),
                "decoded record"
            );
            Ok(skill)
        })
        .collect()
}

fn check_single_line(names: &NameTable) -> Result<()> {
    match names.first_line_break() {
        Some(index) => Err(SkillError::NameLineBreak { index }),
        None => Ok(()),
    }
}

fn check_games(game: Game, skills: &[Skill]) -> Result<()> {
    for (index, skill) in skills.iter().enumerate() {
        if skill.game() != game {
            return Err(SkillError::GameMismatch {
                expected: game,
                actual: skill.game(),
            }
            .at_record(index));
        }
    }
    Ok(())
}
