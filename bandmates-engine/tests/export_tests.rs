//! Export Formatter integration tests
//!
//! Parses the produced CSV back with the `csv` reader and checks the table
//! layout: headers, group-level cells, separators and quoting.

mod helpers;

use bandmates_engine::export::{to_table, write_table, HEADERS};
use bandmates_engine::{CompatibilityMatrix, EngineParams, FormationEngine, Group, RespondentProfile};
use helpers::{profile, random_cohort};
use std::io::Read;

fn form(profiles: &[RespondentProfile], target: usize) -> Vec<Group> {
    let params = EngineParams::default();
    let matrix = CompatibilityMatrix::score(profiles, &params);
    FormationEngine::seeded(params, 8).form(profiles, &matrix, target)
}

fn parse(table: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(table.as_bytes());
    let headers = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

#[test]
fn test_round_trip_counts() {
    let profiles = random_cohort(15, 4);
    let groups = form(&profiles, 4);
    let (headers, rows) = parse(&to_table(&groups).unwrap());

    assert_eq!(headers, HEADERS.to_vec());
    assert!(rows.iter().all(|r| r.len() == 14));

    let member_rows = rows.iter().filter(|r| !is_blank(r)).count();
    let group_rows = rows.iter().filter(|r| !r[0].is_empty()).count();
    let separators = rows.iter().filter(|r| is_blank(r)).count();

    assert_eq!(member_rows, profiles.len());
    assert_eq!(group_rows, groups.len());
    assert_eq!(separators, groups.len());
}

#[test]
fn test_group_cells_only_on_first_member_row() {
    let v = [0.8, 0.8, 0.8, 0.2, 0.6, 0.5];
    let profiles = vec![
        profile("a", v, &["Pop"], &["Dua Lipa"]),
        profile("b", v, &["Pop"], &["Dua Lipa"]),
    ];
    let groups = form(&profiles, 4);
    let (_, rows) = parse(&to_table(&groups).unwrap());

    assert_eq!(rows.len(), 3);
    let (first, second) = (&rows[0], &rows[1]);

    assert_eq!(first[0], "1");
    assert_eq!(first[1], groups[0].name);
    assert_eq!(first[2], "100.0");
    assert_eq!(first[3], "Student a");
    assert_eq!(first[8], "High Energy");
    assert_eq!(first[9], "Pop");
    assert_eq!(first[12], "High-Energy Workout: Pop");

    for column in [0, 1, 2, 9, 10, 11, 12, 13] {
        assert!(second[column].is_empty(), "column {} repeated", HEADERS[column]);
    }
    assert_eq!(second[3], "Student b");
    assert_eq!(second[4], "b@example.edu");
    assert!(is_blank(&rows[2]));
}

#[test]
fn test_special_characters_are_quoted() {
    let mut tricky = profile("q", [0.5; 6], &["Rock", "Pop"], &[]);
    tricky.name = "O'Brien, \"DJ\" Pat".to_string();
    let mut other = profile("r", [0.5; 6], &["Rock"], &[]);
    other.major = "Film\nStudies".to_string();
    let groups = form(&[tricky, other], 4);

    let table = to_table(&groups).unwrap();
    assert!(table.contains("\"O'Brien, \"\"DJ\"\" Pat\""));

    let (_, rows) = parse(&table);
    let names: Vec<&str> = rows.iter().map(|r| r[3].as_str()).collect();
    assert!(names.contains(&"O'Brien, \"DJ\" Pat"));
    assert!(rows.iter().any(|r| r[5] == "Film\nStudies"));
    // Multi-genre cells contain a comma and survive quoting
    assert!(rows.iter().any(|r| r[7] == "Rock, Pop"));
}

#[test]
fn test_write_table_to_file() {
    let groups = form(&random_cohort(6, 2), 3);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.csv");

    write_table(&groups, std::fs::File::create(&path).unwrap()).unwrap();

    let mut written = String::new();
    std::fs::File::open(&path).unwrap().read_to_string(&mut written).unwrap();
    assert_eq!(written, to_table(&groups).unwrap());
}
