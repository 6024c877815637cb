//! Store round-trip and quick-add flow integration tests

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use journal::{
    apply_quick_add, parse_quick_add, Experience, ExperienceStore, Ingestion, Mass,
    QuickAddOutcome,
};

fn substances() -> Vec<String> {
    vec!["caffeine".to_string(), "theanine".to_string()]
}

fn routes() -> Vec<String> {
    vec!["oral".to_string(), "sublingual".to_string()]
}

#[test]
fn test_store_round_trip_preserves_ids_and_doses() {
    let dir = TempDir::new().unwrap();
    let store = ExperienceStore::new(dir.path().join("experiences.json"));

    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let mut experience = Experience::new("Morning", now);
    experience.append(Ingestion::new(
        "CAFFEINE",
        Mass::parse("80mg").unwrap(),
        "mg",
        "oral",
        now,
    ));
    let id = experience.id.clone();

    store.save(&[experience]).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, id);
    assert_eq!(loaded[0].ingestions[0].substance_name, "CAFFEINE");
    assert_eq!(loaded[0].ingestions[0].dose.adjusted, 80.0);
    assert_eq!(loaded[0].ingestions[0].time, now);
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = ExperienceStore::new(dir.path().join("nope.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_corrupt_file_errors_but_load_or_default_recovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("experiences.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = ExperienceStore::new(&path);
    assert!(store.load().is_err());
    assert!(store.load_or_default().is_empty());
}

#[test]
fn test_quick_add_end_to_end() {
    let dir = TempDir::new().unwrap();
    let store = ExperienceStore::new(dir.path().join("experiences.json"));
    let mut experiences = store.load_or_default();

    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let parse = parse_quick_add("caffeine 80mg oral", &substances(), &routes());
    let quick_add = parse.quick_add.expect("full quick-add");

    let first = apply_quick_add(&mut experiences, &quick_add, now).unwrap();
    let QuickAddOutcome::Created { id, title } = first else {
        panic!("first quick-add should create");
    };
    assert_eq!(title, "Quick Add: CAFFEINE");

    // A second dose an hour later lands in the same experience.
    let later = now + Duration::hours(1);
    let second = apply_quick_add(&mut experiences, &quick_add, later).unwrap();
    assert_eq!(
        second,
        QuickAddOutcome::AppendedTo {
            id: id.clone(),
            title: "Quick Add: CAFFEINE".to_string()
        }
    );
    assert_eq!(experiences.len(), 1);
    assert_eq!(experiences[0].ingestions.len(), 2);

    // Saved and reloaded, the appended entry survives.
    store.save(&experiences).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded[0].id, id);
    assert_eq!(reloaded[0].ingestions.len(), 2);
}

#[test]
fn test_import_accepts_the_on_device_document() {
    // Shape produced by the mobile app: camelCase keys, millisecond
    // timestamps, no experience ids.
    let document = r#"[
        {
            "title": "Evening tea",
            "creationDate": 1700000000000,
            "sortDate": 1700000000000,
            "ingestions": [
                {
                    "substanceName": "THEANINE",
                    "time": 1700000100000,
                    "creationDate": 1700000100000,
                    "dose": {"base": 200.0, "multiplier": 1.0, "adjusted": 200.0, "unit": "mg"},
                    "units": "mg",
                    "administrationRoute": "oral"
                }
            ]
        }
    ]"#;

    let imported = ExperienceStore::import_json(document).unwrap();
    assert_eq!(imported.len(), 1);
    assert!(!imported[0].id.is_empty());
    assert_eq!(imported[0].ingestions[0].substance_name, "THEANINE");

    assert!(ExperienceStore::import_json("{\"not\": \"an array\"}").is_err());
}
