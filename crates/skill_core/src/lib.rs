//! Codec for the player skill tables of the Etrian Odyssey games.
//!
//! A table is a run of fixed-length records, one per skill, paired with a
//! separate name list. [`table::SkillTable`] decodes and encodes whole
//! tables; [`core_api`] wraps that in the session facade used by the CLI.

pub mod bitfield;
pub mod core_api;
pub mod data_section;
pub mod enums;
pub mod error;
pub mod flags;
pub mod layout;
pub mod name_table;
pub mod reader;
pub mod schema;
pub mod skill;
pub mod table;

pub use error::{ErrorCode, Result, SkillError};
pub use name_table::NameTable;
pub use schema::Game;
pub use skill::Skill;
pub use table::SkillTable;
