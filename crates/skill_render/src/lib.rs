use skill_core::core_api::Session;
use skill_core::layout::{RegionId, TableLayout};
use skill_core::{Game, Skill, SkillError, SkillTable};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

const INDEX_COL_WIDTH: usize = 6;
const NAME_COL_WIDTH: usize = 32;
const LEVEL_COL_WIDTH: usize = 10;

/// Key written with each record to show its table position. Ignored when a
/// document is read back.
pub const SKILL_ID_KEY: &str = "skill_id";

/// Ordering hints for record keys. Lower sorts first; keys not listed sort
/// at 0. Ties keep the order the record type declares them in.
const KEY_PRIORITIES: &[(&str, i32)] = &[
    (SKILL_ID_KEY, -100),
    ("name", -99),
    ("max_level", -98),
    ("skill_type", -97),
    ("use_requirements", -96),
    ("target_status", -95),
    ("target_type", -94),
    ("target_team", -93),
    ("usable_location", -92),
    ("modifier_status", -91),
    ("modifier_type", -90),
    ("modifier_element", -89),
    ("damage_element", -88),
    ("infliction_status", -87),
    ("associated_disables", -86),
    ("skill_flags", -85),
    ("unknown_words", -10),
    ("data_sections", 100),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid skill document: {0}")]
    Document(String),

    #[error("skill {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] SkillError),
}

/// The exchange document for a whole table: `{"game": ..., "skills": [...]}`.
pub fn render_table_json(table: &SkillTable) -> Result<JsonValue, ExchangeError> {
    let mut skills = Vec::with_capacity(table.len());
    for (index, skill) in table.iter().enumerate() {
        skills.push(skill_to_json(index, skill)?);
    }

    let mut out = JsonMap::new();
    out.insert(
        "game".to_string(),
        JsonValue::String(table.game().as_str().to_string()),
    );
    out.insert("skills".to_string(), JsonValue::Array(skills));
    Ok(JsonValue::Object(out))
}

pub fn write_json(value: &JsonValue, style: JsonStyle) -> Result<String, ExchangeError> {
    let mut text = match style {
        JsonStyle::Pretty => serde_json::to_string_pretty(value)?,
        JsonStyle::Compact => serde_json::to_string(value)?,
    };
    text.push('\n');
    Ok(text)
}

fn skill_to_json(index: usize, skill: &Skill) -> Result<JsonValue, ExchangeError> {
    let JsonValue::Object(fields) = serde_json::to_value(skill)? else {
        return Err(ExchangeError::Document(format!(
            "skill {index} did not serialize to an object"
        )));
    };

    let mut entries: Vec<(String, JsonValue)> = Vec::with_capacity(fields.len() + 1);
    entries.push((SKILL_ID_KEY.to_string(), JsonValue::from(index)));
    entries.extend(fields);
    entries.sort_by_key(|(key, _)| key_priority(key));

    Ok(JsonValue::Object(entries.into_iter().collect()))
}

fn key_priority(key: &str) -> i32 {
    KEY_PRIORITIES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, priority)| priority)
        .unwrap_or(0)
}

/// Read an exchange document back into a table. Every record must carry
/// every field of its game's record type and nothing else.
pub fn parse_table_json(text: &str) -> Result<SkillTable, ExchangeError> {
    let value: JsonValue = serde_json::from_str(text)?;
    table_from_json(value)
}

pub fn table_from_json(value: JsonValue) -> Result<SkillTable, ExchangeError> {
    let JsonValue::Object(mut document) = value else {
        return Err(ExchangeError::Document(
            "top level must be an object".to_string(),
        ));
    };

    if let Some(key) = document
        .keys()
        .find(|key| key.as_str() != "game" && key.as_str() != "skills")
    {
        return Err(ExchangeError::Document(format!(
            "unknown top-level key `{key}`, expected `game` and `skills`"
        )));
    }

    let game: Game = match document.remove("game") {
        Some(JsonValue::String(name)) => name.parse()?,
        Some(other) => {
            return Err(ExchangeError::Document(format!(
                "`game` must be a string, found {other}"
            )));
        }
        None => return Err(ExchangeError::Document("missing `game`".to_string())),
    };

    let records = match document.remove("skills") {
        Some(JsonValue::Array(records)) => records,
        Some(_) => {
            return Err(ExchangeError::Document(
                "`skills` must be an array".to_string(),
            ));
        }
        None => return Err(ExchangeError::Document("missing `skills`".to_string())),
    };

    let mut skills = Vec::with_capacity(records.len());
    for (index, mut record) in records.into_iter().enumerate() {
        if let JsonValue::Object(fields) = &mut record {
            fields.remove(SKILL_ID_KEY);
        }
        let skill = Skill::deserialize_for(game, record)
            .map_err(|source| ExchangeError::Record { index, source })?;
        skills.push(skill);
    }

    Ok(SkillTable::new(game, skills)?)
}

/// One line per record: index, name, max level and section count.
pub fn render_listing_text(session: &Session) -> String {
    let summary = session.summary();
    let mut out = String::new();

    out.push_str(&format!(
        "{} skill table: {} records of {} bytes\n\n",
        summary.game, summary.record_count, summary.record_len
    ));
    out.push_str(&format!(
        "{:<iw$}{:<nw$}{:<lw$}{}\n",
        "index",
        "name",
        "max_level",
        "sections",
        iw = INDEX_COL_WIDTH,
        nw = NAME_COL_WIDTH + 2,
        lw = LEVEL_COL_WIDTH,
    ));

    for (index, skill) in session.table().iter().enumerate() {
        let line = format!(
            "{:<iw$}{:<nw$}{:<lw$}{}",
            index,
            fit_column(skill.name(), NAME_COL_WIDTH),
            skill.max_level(),
            skill.data_sections().len(),
            iw = INDEX_COL_WIDTH,
            nw = NAME_COL_WIDTH + 2,
            lw = LEVEL_COL_WIDTH,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if summary.record_count == 0 {
        out.push_str("  none\n");
    }
    out
}

/// The listing as JSON: the session summary plus one entry per record.
pub fn render_listing_json(session: &Session) -> Result<JsonValue, ExchangeError> {
    let JsonValue::Object(mut out) = serde_json::to_value(session.summary())? else {
        return Err(ExchangeError::Document(
            "summary did not serialize to an object".to_string(),
        ));
    };

    let records = session
        .table()
        .iter()
        .enumerate()
        .map(|(index, skill)| {
            let mut entry = JsonMap::new();
            entry.insert("index".to_string(), JsonValue::from(index));
            entry.insert(
                "name".to_string(),
                JsonValue::String(skill.name().to_string()),
            );
            entry.insert("max_level".to_string(), JsonValue::from(skill.max_level()));
            entry.insert(
                "sections".to_string(),
                JsonValue::from(skill.data_sections().len()),
            );
            entry.insert(
                "kinds".to_string(),
                JsonValue::from(skill.data_sections().kinds()),
            );
            JsonValue::Object(entry)
        })
        .collect();
    out.insert("records".to_string(), JsonValue::Array(records));
    Ok(JsonValue::Object(out))
}

pub fn render_layout_text(layout: &TableLayout) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} table layout: {} records, {} bytes\n",
        layout.game,
        layout.record_count(),
        layout.table_len
    ));

    for region in &layout.regions {
        let label = match region.id {
            RegionId::Header { record } => format!("record {record} header"),
            RegionId::Slot { record, slot } => format!(
                "record {record} slot {slot}{}",
                if region.used { "" } else { " (empty)" }
            ),
        };
        out.push_str(&format!(
            "{:#08x}..{:#08x}  {:>4}  {label}\n",
            region.range.start,
            region.range.end,
            region.range.len()
        ));
    }
    out
}

pub fn render_layout_json(layout: &TableLayout) -> Result<JsonValue, ExchangeError> {
    Ok(serde_json::to_value(layout)?)
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}
