use skill_core::core_api::{CoreErrorCode, Engine};
use skill_core::data_section::{DataSection, DataSections};
use skill_core::skill::{Eo3Skill, Eo3SkillType, Eo5Skill, Skill};
use skill_core::{Game, SkillTable};

fn eo3_skill(name: &str, sections: usize) -> Skill {
    Skill::from(Eo3Skill {
        name: name.to_string(),
        max_level: 10,
        skill_type: Eo3SkillType::TecAttack,
        data_sections: DataSections::from(
            (0..sections)
                .map(|i| DataSection::new(i as i32 + 1, vec![i as i32; 10]))
                .collect::<Vec<_>>(),
        ),
        ..Default::default()
    })
}

fn eo3_table_bytes() -> Vec<u8> {
    let table = SkillTable::new(
        Game::Eo3,
        vec![eo3_skill("Fire Formula", 2), eo3_skill("Ice Formula", 2), eo3_skill("Analyze", 0)],
    )
    .unwrap();
    table.encode().unwrap().0
}

#[test]
fn open_table_pairs_names_and_summarizes() {
    let engine = Engine::new();
    let session = engine
        .open_table(eo3_table_bytes(), "Fire Formula\r\nIce Formula\r\nAnalyze\r\n", Game::Eo3)
        .expect("table should open");

    assert_eq!(session.game(), Game::Eo3);
    assert_eq!(session.table().get(1).unwrap().name(), "Ice Formula");

    let summary = session.summary();
    assert_eq!(summary.record_count, 3);
    assert_eq!(summary.record_len, 0x178);
    assert_eq!(summary.section_count_histogram.len(), 9);
    assert_eq!(summary.section_count_histogram[0], 1);
    assert_eq!(summary.section_count_histogram[2], 2);
}

#[test]
fn encode_reproduces_the_input_bytes() {
    let bytes = eo3_table_bytes();
    let session = Engine::new()
        .open_table(&bytes, "a\nb\nc\n", Game::Eo3)
        .unwrap();
    let (out, names) = session.encode().unwrap();
    assert_eq!(out, bytes);
    assert_eq!(names, "a\nb\nc\n");
}

#[test]
fn wrong_game_reports_a_decode_error() {
    // Three EO3 records are not a whole number of EO5 records.
    let err = Engine::new()
        .open_table_unnamed(eo3_table_bytes(), Game::Eo5)
        .unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Decode);
    assert!(err.message.contains("not a multiple"), "{}", err.message);
}

#[test]
fn missing_names_are_a_decode_error() {
    let err = Engine::new()
        .open_table(eo3_table_bytes(), "only one\n", Game::Eo3)
        .unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Decode);
    assert_eq!(err.message, "name list has no entry for record 1");
}

#[test]
fn open_records_rejects_foreign_records() {
    let err = Engine::new()
        .open_records(Game::Eo3, vec![eo3_skill("a", 0), Skill::from(Eo5Skill::default())])
        .unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Structure);
    assert_eq!(err.record, Some(1));
}

#[test]
fn structure_errors_keep_their_record_index() {
    let mut broken = eo3_skill("broken", 1);
    broken
        .data_sections_mut()
        .push(DataSection::new(9, vec![1, 2, 3]));
    let session = Engine::new()
        .open_records(Game::Eo3, vec![eo3_skill("fine", 1), broken])
        .unwrap();

    let err = session.encode().unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Structure);
    assert_eq!(err.record, Some(1));
    assert!(err.to_string().starts_with("Structure: record 1:"), "{err}");
}

#[test]
fn apply_names_checks_pairing() {
    let mut session = Engine::new()
        .open_table_unnamed(eo3_table_bytes(), Game::Eo3)
        .unwrap();
    let err = session.apply_names("x\ny\n").unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Pairing);

    session.apply_names("x\ny\nz").unwrap();
    assert_eq!(session.encode().unwrap().1, "x\ny\nz\n");
}

#[test]
fn layout_covers_the_encoded_table() {
    let session = Engine::new()
        .open_table_unnamed(eo3_table_bytes(), Game::Eo3)
        .unwrap();
    let layout = session.layout().unwrap();
    assert_eq!(layout.table_len, 3 * 0x178);
    assert_eq!(layout.record_count(), 3);
}

#[test]
fn layout_shows_the_source_slots_not_the_reencoded_ones() {
    let shape = Game::Eo3.section_shape();
    let slot0 = Game::Eo3.schema().header_len();
    let (slot1, slot2) = (slot0 + shape.slot_len(), slot0 + 2 * shape.slot_len());

    // Move the second section of record 0 from slot 1 to slot 2.
    let mut bytes = eo3_table_bytes();
    let second = bytes[slot1..slot2].to_vec();
    bytes[slot2..slot2 + shape.slot_len()].copy_from_slice(&second);
    bytes[slot1..slot2].fill(0);

    let session = Engine::new()
        .open_table_unnamed(&bytes, Game::Eo3)
        .unwrap();
    let used: Vec<bool> = session
        .layout()
        .unwrap()
        .regions
        .iter()
        .skip(1)
        .take(3)
        .map(|region| region.used)
        .collect();
    assert_eq!(used, vec![true, false, true]);

    let reencoded = Engine::new()
        .open_records(Game::Eo3, session.into_table().into_skills())
        .unwrap();
    let used: Vec<bool> = reencoded
        .layout()
        .unwrap()
        .regions
        .iter()
        .skip(1)
        .take(3)
        .map(|region| region.used)
        .collect();
    assert_eq!(used, vec![true, true, false]);
}
