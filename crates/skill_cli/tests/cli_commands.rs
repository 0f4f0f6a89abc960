use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use skill_core::data_section::{DataSection, DataSections};
use skill_core::skill::{Eo4Skill, Skill};
use skill_core::{Game, SkillTable};

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_eoskill"))
        .args(args)
        .output()
        .expect("failed to run eoskill CLI")
}

fn temp_output_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{ext}",
        std::process::id(),
        nanos
    ))
}

fn path_str(path: &PathBuf) -> String {
    path.to_string_lossy().to_string()
}

/// Write a small EO4 table and its name list, returning both paths.
fn write_fixture(prefix: &str) -> (PathBuf, PathBuf) {
    let skills = ["Link Fire", "Link Ice", "Rear Guard"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Skill::from(Eo4Skill {
                name: name.to_string(),
                max_level: 10 - i as u8,
                data_sections: DataSections::from(
                    (0..i)
                        .map(|k| DataSection::new(k as i32 + 1, vec![25; 10]))
                        .collect::<Vec<_>>(),
                ),
                ..Default::default()
            })
        })
        .collect();
    let (bytes, names) = SkillTable::new(Game::Eo4, skills)
        .unwrap()
        .encode()
        .unwrap();

    let table_path = temp_output_path(prefix, "tbl");
    let names_path = temp_output_path(prefix, "txt");
    fs::write(&table_path, bytes).expect("fixture table should be writable");
    fs::write(&names_path, names.to_text()).expect("fixture names should be writable");
    (table_path, names_path)
}

#[test]
fn decode_then_encode_reproduces_the_table() {
    let (table, names) = write_fixture("eoskill_roundtrip");
    let json = temp_output_path("eoskill_roundtrip", "json");
    let table_out = temp_output_path("eoskill_roundtrip_out", "tbl");
    let names_out = temp_output_path("eoskill_roundtrip_out", "txt");

    let output = run_cli(&[
        "decode",
        &path_str(&table),
        "--names",
        &path_str(&names),
        "--game",
        "eo4",
        "--output",
        &path_str(&json),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let document: Value =
        serde_json::from_str(&fs::read_to_string(&json).unwrap()).expect("output should be JSON");
    assert_eq!(document["game"], "EO4");
    assert_eq!(document["skills"][2]["name"], "Rear Guard");
    assert_eq!(document["skills"][2]["data_sections"].as_array().unwrap().len(), 2);

    let output = run_cli(&[
        "encode",
        &path_str(&json),
        "--game",
        "EO4",
        "--table-out",
        &path_str(&table_out),
        "--names-out",
        &path_str(&names_out),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(fs::read(&table_out).unwrap(), fs::read(&table).unwrap());
    assert_eq!(
        fs::read_to_string(&names_out).unwrap(),
        fs::read_to_string(&names).unwrap()
    );

    for path in [table, names, json, table_out, names_out] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn encode_rejects_a_document_for_another_game() {
    let (table, names) = write_fixture("eoskill_mismatch");
    let json = temp_output_path("eoskill_mismatch", "json");
    let table_out = temp_output_path("eoskill_mismatch_out", "tbl");
    let names_out = temp_output_path("eoskill_mismatch_out", "txt");

    let output = run_cli(&[
        "decode",
        &path_str(&table),
        "--names",
        &path_str(&names),
        "--game",
        "EO4",
        "--output",
        &path_str(&json),
    ]);
    assert!(output.status.success());

    let output = run_cli(&[
        "encode",
        &path_str(&json),
        "--game",
        "EO3",
        "--table-out",
        &path_str(&table_out),
        "--names-out",
        &path_str(&names_out),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("record belongs to EO4, expected EO3"), "{stderr}");
    assert!(!table_out.exists());

    for path in [table, names, json] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn encode_with_replacement_names_checks_pairing() {
    let (table, names) = write_fixture("eoskill_rename");
    let json = temp_output_path("eoskill_rename", "json");
    let renamed = temp_output_path("eoskill_rename_names", "txt");
    let table_out = temp_output_path("eoskill_rename_out", "tbl");
    let names_out = temp_output_path("eoskill_rename_out", "txt");

    let output = run_cli(&[
        "decode",
        &path_str(&table),
        "--names",
        &path_str(&names),
        "--game",
        "EO4",
        "--output",
        &path_str(&json),
    ]);
    assert!(output.status.success());

    fs::write(&renamed, "One\nTwo\n").unwrap();
    let encode_args = [
        "encode".to_string(),
        path_str(&json),
        "--game".to_string(),
        "EO4".to_string(),
        "--table-out".to_string(),
        path_str(&table_out),
        "--names-out".to_string(),
        path_str(&names_out),
        "--names".to_string(),
        path_str(&renamed),
    ];
    let args: Vec<&str> = encode_args.iter().map(String::as_str).collect();

    let output = run_cli(&args);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("name list has 2 entries"));

    fs::write(&renamed, "One\r\nTwo\r\nThree\r\n").unwrap();
    let output = run_cli(&args);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&names_out).unwrap(), "One\nTwo\nThree\n");
    assert_eq!(fs::read(&table_out).unwrap(), fs::read(&table).unwrap());

    for path in [table, names, json, renamed, table_out, names_out] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn show_lists_records() {
    let (table, names) = write_fixture("eoskill_show");

    let output = run_cli(&[
        "show",
        &path_str(&table),
        "--names",
        &path_str(&names),
        "--game",
        "EO4",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("EO4 skill table: 3 records of 376 bytes"));
    assert!(stdout.contains("Link Ice"));

    let output = run_cli(&[
        "show",
        &path_str(&table),
        "--names",
        &path_str(&names),
        "--game",
        "EO4",
        "--json",
    ]);
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["game"], "EO4");
    assert_eq!(json["record_count"], 3);
    assert_eq!(json["records"][0]["max_level"], 10);
    assert_eq!(json["section_count_histogram"], serde_json::json!([1, 1, 1, 0, 0, 0, 0, 0, 0]));

    for path in [table, names] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn layout_json_reports_regions() {
    let (table, names) = write_fixture("eoskill_layout");

    let output = run_cli(&["layout", &path_str(&table), "--game", "EO4", "--json"]);
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["table_len"], 3 * 0x178);
    assert_eq!(json["regions"].as_array().unwrap().len(), 3 * 9);

    for path in [table, names] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn layout_reports_interior_empty_slots_in_place() {
    let (table, names) = write_fixture("eoskill_layout_gap");
    let shape = Game::Eo4.section_shape();
    let slot1 = 2 * Game::Eo4.record_len() + Game::Eo4.schema().header_len() + shape.slot_len();
    let slot2 = slot1 + shape.slot_len();

    // Record 2 holds two sections; move the second one down a slot.
    let mut bytes = fs::read(&table).unwrap();
    let second = bytes[slot1..slot2].to_vec();
    bytes[slot2..slot2 + shape.slot_len()].copy_from_slice(&second);
    bytes[slot1..slot2].fill(0);
    fs::write(&table, bytes).unwrap();

    let output = run_cli(&["layout", &path_str(&table), "--game", "EO4"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("record 2 slot 1 (empty)"), "{stdout}");
    assert!(!stdout.contains("record 2 slot 2 (empty)"), "{stdout}");

    for path in [table, names] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn truncated_table_fails_with_record_length_error() {
    let (table, names) = write_fixture("eoskill_truncated");
    let mut bytes = fs::read(&table).unwrap();
    bytes.truncate(bytes.len() - 1);
    fs::write(&table, bytes).unwrap();

    let output = run_cli(&["layout", &path_str(&table), "--game", "EO4"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a multiple of the record length 376"), "{stderr}");

    for path in [table, names] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn unsupported_game_is_an_argument_error() {
    let output = run_cli(&["layout", "does-not-matter.tbl", "--game", "EO6"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported game"), "{stderr}");
}
