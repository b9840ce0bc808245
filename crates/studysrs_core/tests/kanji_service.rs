use rusqlite::Connection;
use studysrs_core::db::open_db_in_memory;
use studysrs_core::{
    KanjiDto, KanjiRepository, KanjiService, KanjiServiceError, SqliteKanjiRepository,
};

fn service(conn: &Connection) -> KanjiService<SqliteKanjiRepository<'_>> {
    KanjiService::new(SqliteKanjiRepository::new(conn))
}

fn created_id(dto: Option<KanjiDto>) -> i64 {
    dto.expect("kanji should be created")
        .id
        .expect("created kanji should carry an id")
}

fn edge_rows(conn: &Connection) -> Vec<(i64, i64)> {
    let mut stmt = conn
        .prepare("SELECT kanji_id, confusion_id FROM kanji_confusions ORDER BY kanji_id, confusion_id;")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn create_and_reload_by_id_and_character_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .create_from_parts("日", "Sun/Day")
        .unwrap()
        .expect("kanji should be created");
    assert!(created.id.is_some());
    assert_eq!(created.character.as_deref(), Some("日"));
    assert_eq!(created.meaning.as_deref(), Some("Sun/Day"));
    assert_eq!(created.confusions, Some(Vec::new()));

    let by_id = service.find_by_id(created.id.unwrap()).unwrap();
    let by_character = service.find_by_character("日").unwrap();
    assert_eq!(by_id.as_ref(), Some(&created));
    assert_eq!(by_character, Some(created));
}

#[test]
fn create_ignores_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .create(&KanjiDto::new("月", "Moon/Month").with_id(42))
        .unwrap()
        .unwrap();
    assert_eq!(created.id, Some(1));
    assert!(service.find_by_id(42).unwrap().is_none());
}

#[test]
fn create_rejects_duplicate_character() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.create_from_parts("木", "Tree").unwrap();
    let err = service.create_from_parts("木", "Wood").unwrap_err();

    assert!(matches!(err, KanjiServiceError::DuplicateEntry(ref c) if c == "木"));
    assert_eq!(service.find_all().unwrap().len(), 1);
}

#[test]
fn create_with_confused_characters_checks_duplicate_first() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_from_parts("牲", "Sacrifice").unwrap();

    let err = service
        .create_from_parts_with_confused_characters("牲", "Sacrifice", &["牲"])
        .unwrap_err();
    assert!(matches!(err, KanjiServiceError::DuplicateEntry(_)));
}

#[test]
fn create_without_character_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let request = KanjiDto {
        meaning: Some("Nothing".to_string()),
        ..KanjiDto::default()
    };
    assert!(service.create(&request).unwrap().is_none());
    assert!(service
        .create_with_confused_characters(&request, &["日"])
        .unwrap()
        .is_none());
    assert!(service.find_all().unwrap().is_empty());
}

#[test]
fn confusing_two_kanji_is_visible_from_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let sacrifice_id = created_id(service.create_from_parts("牲", "Sacrifice").unwrap());
    let personality = service
        .create_from_parts_with_confused_characters("性", "Personality/Gender", &["牲"])
        .unwrap()
        .unwrap();
    let personality_id = personality.id.unwrap();

    assert_eq!(personality.confusions, Some(vec![sacrifice_id]));

    let sacrifice = service.find_by_id(sacrifice_id).unwrap().unwrap();
    assert_eq!(sacrifice.confusions, Some(vec![personality_id]));

    let reloaded = service.find_by_character("性").unwrap().unwrap();
    assert_eq!(reloaded.confusions, Some(vec![sacrifice_id]));
}

#[test]
fn confusion_pair_is_stored_once_on_higher_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let lower = created_id(service.create_from_parts("土", "Soil").unwrap());
    let higher = created_id(
        service
            .create_from_parts_with_confused_ids("士", "Samurai", &[lower])
            .unwrap(),
    );

    assert_eq!(edge_rows(&conn), vec![(higher, lower)]);

    let repo = SqliteKanjiRepository::new(&conn);
    let higher_kanji = repo.get_kanji(higher).unwrap().unwrap();
    let lower_kanji = repo.get_kanji(lower).unwrap().unwrap();
    assert_eq!(higher_kanji.relation().prior_side().len(), 1);
    assert!(higher_kanji.relation().later_side().is_empty());
    assert_eq!(lower_kanji.relation().later_side().len(), 1);
    assert!(lower_kanji.relation().prior_side().is_empty());
}

#[test]
fn unknown_confusions_are_dropped_silently() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let known = created_id(service.create_from_parts("末", "End").unwrap());

    let by_character = service
        .create_from_parts_with_confused_characters("未", "Not yet", &["末", "無"])
        .unwrap()
        .unwrap();
    assert_eq!(by_character.confusions, Some(vec![known]));

    let by_id = service
        .create_from_parts_with_confused_ids("朱", "Vermilion", &[known, 999])
        .unwrap()
        .unwrap();
    assert_eq!(by_id.confusions, Some(vec![known]));

    let listed = service
        .create(&KanjiDto::new("味", "Taste").with_confusions(vec![known, 1000]))
        .unwrap()
        .unwrap();
    assert_eq!(listed.confusions, Some(vec![known]));

    let end = service.find_by_id(known).unwrap().unwrap();
    assert_eq!(end.confusions.map(|ids| ids.len()), Some(3));
}

#[test]
fn repeated_confusion_characters_create_one_edge() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.create_from_parts("己", "Self").unwrap();
    let created = service
        .create_from_parts_with_confused_characters("已", "Already", &["己", "己"])
        .unwrap()
        .unwrap();

    assert_eq!(created.confusions.map(|ids| ids.len()), Some(1));
    assert_eq!(edge_rows(&conn).len(), 1);
}

#[test]
fn meaning_search_matches_whole_segments_only() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let cut = created_id(service.create_from_parts("切", "Cut").unwrap());
    service.create_from_parts("断", "Cut off").unwrap();
    let sever = created_id(service.create_from_parts("斬", "Behead/Cut/Kill").unwrap());

    let hits = service.find_all_by_meaning_term("Cut").unwrap();
    let ids = hits.iter().filter_map(|hit| hit.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![cut, sever]);

    assert!(service.find_all_by_meaning_term("cut").unwrap().is_empty());
    assert!(service.find_all_by_meaning_term("").unwrap().is_empty());
    assert!(service.find_all_by_meaning_term("C.t").unwrap().is_empty());
}

#[test]
fn update_overwrites_fields_and_confusions() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = created_id(service.create_from_parts("人", "Person").unwrap());
    let second = created_id(service.create_from_parts("入", "Enter").unwrap());
    let third = created_id(
        service
            .create_from_parts_with_confused_ids("八", "Eight", &[first])
            .unwrap(),
    );

    let updated = service
        .update(
            &KanjiDto::new("八", "Eight/Many")
                .with_id(third)
                .with_confusions(vec![second, third]),
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, Some(third));
    assert_eq!(updated.meaning.as_deref(), Some("Eight/Many"));
    assert_eq!(updated.confusions, Some(vec![second]));
    assert_eq!(
        service.find_by_id(first).unwrap().unwrap().confusions,
        Some(Vec::new())
    );
    assert_eq!(edge_rows(&conn), vec![(third, second)]);
}

#[test]
fn update_of_lower_id_rewrites_canonical_rows() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let lower = created_id(service.create_from_parts("大", "Big").unwrap());
    let higher = created_id(service.create_from_parts("犬", "Dog").unwrap());

    service
        .update(
            &KanjiDto::new("大", "Big/Large")
                .with_id(lower)
                .with_confusions(vec![higher]),
        )
        .unwrap()
        .unwrap();

    assert_eq!(edge_rows(&conn), vec![(higher, lower)]);
    let dog = service.find_by_id(higher).unwrap().unwrap();
    assert_eq!(dog.confusions, Some(vec![lower]));
}

#[test]
fn update_without_confusions_clears_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let sacrifice = created_id(service.create_from_parts("牲", "Sacrifice").unwrap());
    let personality = created_id(
        service
            .create_from_parts_with_confused_ids("性", "Personality", &[sacrifice])
            .unwrap(),
    );

    let updated = service
        .update(&KanjiDto::new("性", "Personality").with_id(personality))
        .unwrap()
        .unwrap();

    assert_eq!(updated.confusions, Some(Vec::new()));
    assert_eq!(
        service.find_by_id(sacrifice).unwrap().unwrap().confusions,
        Some(Vec::new())
    );
}

#[test]
fn update_with_missing_or_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_from_parts("山", "Mountain").unwrap();

    assert!(service
        .update(&KanjiDto::new("山", "Hill"))
        .unwrap()
        .is_none());
    assert!(service
        .update(&KanjiDto::new("川", "River").with_id(77))
        .unwrap()
        .is_none());
    assert!(service.find_by_id(77).unwrap().is_none());
    assert_eq!(
        service
            .find_by_character("山")
            .unwrap()
            .unwrap()
            .meaning
            .as_deref(),
        Some("Mountain")
    );
}

#[test]
fn update_onto_existing_character_is_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.create_from_parts("上", "Up").unwrap();
    let down = created_id(service.create_from_parts("下", "Down").unwrap());

    let err = service
        .update(&KanjiDto::new("上", "Down").with_id(down))
        .unwrap_err();
    assert!(matches!(err, KanjiServiceError::DuplicateEntry(ref c) if c == "上"));
    assert_eq!(err.to_string(), "kanji `上` already saved");
    assert_eq!(
        service.find_by_id(down).unwrap().unwrap().character.as_deref(),
        Some("下")
    );
}

#[test]
fn delete_by_id_returns_snapshot_and_releases_partners() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let sacrifice = created_id(service.create_from_parts("牲", "Sacrifice").unwrap());
    let personality = created_id(
        service
            .create_from_parts_with_confused_ids("性", "Personality/Gender", &[sacrifice])
            .unwrap(),
    );

    let deleted = service.delete_by_id(sacrifice).unwrap().unwrap();
    assert_eq!(deleted.id, Some(sacrifice));
    assert_eq!(deleted.confusions, Some(vec![personality]));

    assert!(service.find_by_id(sacrifice).unwrap().is_none());
    assert_eq!(
        service.find_by_id(personality).unwrap().unwrap().confusions,
        Some(Vec::new())
    );
    assert!(edge_rows(&conn).is_empty());
    assert!(service.delete_by_id(sacrifice).unwrap().is_none());
}

#[test]
fn delete_by_example_matches_set_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    created_id(service.create_from_parts("一", "One").unwrap());
    let two = created_id(service.create_from_parts("二", "Two").unwrap());

    assert!(service.delete(&KanjiDto::new("二", "One")).unwrap().is_none());
    assert!(service.delete(&KanjiDto::default()).unwrap().is_none());

    let by_meaning = KanjiDto {
        meaning: Some("Two".to_string()),
        ..KanjiDto::default()
    };
    let deleted = service.delete(&by_meaning).unwrap().unwrap();
    assert_eq!(deleted.id, Some(two));
    assert!(service.find_by_id(two).unwrap().is_none());
    assert_eq!(service.find_all().unwrap().len(), 1);
}

#[test]
fn delete_by_example_leaves_ambiguous_matches_alone() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.create_from_parts("切", "Cut").unwrap();
    service.create_from_parts("伐", "Cut").unwrap();

    let by_meaning = KanjiDto {
        meaning: Some("Cut".to_string()),
        ..KanjiDto::default()
    };
    assert!(service.delete(&by_meaning).unwrap().is_none());
    assert_eq!(service.find_all().unwrap().len(), 2);

    let deleted = service
        .delete(&KanjiDto::new("伐", "Cut"))
        .unwrap()
        .unwrap();
    assert_eq!(deleted.character.as_deref(), Some("伐"));
    assert_eq!(service.find_all().unwrap().len(), 1);
}

#[test]
fn blank_character_is_treated_as_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let stored = created_id(service.create_from_parts("日", "Sun").unwrap());

    assert!(service.create(&KanjiDto::new("", "Nothing")).unwrap().is_none());
    assert!(service.create_from_parts("  ", "Nothing").unwrap().is_none());
    assert!(service
        .create_from_parts_with_confused_characters(" ", "Nothing", &["日"])
        .unwrap()
        .is_none());
    assert!(service
        .update(&KanjiDto::new(" ", "x").with_id(stored))
        .unwrap()
        .is_none());

    let unchanged = service.find_by_id(stored).unwrap().unwrap();
    assert_eq!(unchanged.character.as_deref(), Some("日"));
    assert_eq!(service.find_all().unwrap().len(), 1);
}
