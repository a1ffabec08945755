use gradebook_core::{
    DeleteMode, GradeService, KvStore, MemoryKvStore, NewSubject, NoteService, ServiceError,
    SubjectService, ValidationError,
};

fn subject(name: &str, threshold: &str) -> NewSubject {
    NewSubject {
        name: name.to_string(),
        threshold: threshold.to_string(),
        banner: None,
    }
}

#[test]
fn add_appends_and_parses_threshold() {
    let store = MemoryKvStore::new();
    let service = SubjectService::new(&store);

    service.add("2024", &subject("Math", "7")).unwrap();
    let mut history = subject("History", "5.5");
    history.banner = Some("file:///banner.png".to_string());
    let subjects = service.add("2024", &history).unwrap();

    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0].name, "Math");
    assert_eq!(subjects[0].passing_threshold, 7.0);
    assert_eq!(subjects[1].passing_threshold, 5.5);
    assert_eq!(subjects[1].banner(), Some("file:///banner.png"));
    assert_eq!(service.load("2024").unwrap(), subjects);
    assert!(service.load("2025").unwrap().is_empty());
}

#[test]
fn invalid_input_is_rejected_before_persistence() {
    let store = MemoryKvStore::new();
    let service = SubjectService::new(&store);

    let cases = [
        (subject("", "7"), ValidationError::EmptySubjectName),
        (subject("Math", ""), ValidationError::EmptyThreshold),
        (
            subject("Math", "seven"),
            ValidationError::InvalidThreshold("seven".to_string()),
        ),
    ];
    for (input, expected) in cases {
        match service.add("2024", &input).unwrap_err() {
            ServiceError::Validation(actual) => assert_eq!(actual, expected),
            other => panic!("unexpected error: {other}"),
        }
    }
    assert!(store.is_empty());
}

#[test]
fn duplicate_subject_name_is_rejected_within_year_only() {
    let store = MemoryKvStore::new();
    let service = SubjectService::new(&store);
    service.add("2024", &subject("Math", "7")).unwrap();

    let err = service.add("2024", &subject("Math", "6")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::DuplicateSubject { .. })
    ));
    service.add("2025", &subject("Math", "6")).unwrap();
}

#[test]
fn remove_filters_all_matches_and_keeps_ledgers_by_default() {
    let store = MemoryKvStore::new();
    store
        .set(
            "materias_2024",
            r#"[{"nome":"Math","media":7},{"nome":"Art","media":5},{"nome":"Math","media":6}]"#,
        )
        .unwrap();
    let service = SubjectService::new(&store);
    let grades = GradeService::new(&store);
    grades.add("2024", "Math", "10").unwrap();

    let remaining = service.remove("2024", "Math").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Art");
    assert_eq!(grades.load("2024", "Math").unwrap().len(), 1);

    service
        .remove_with_mode("2024", "Art", DeleteMode::Cascade)
        .unwrap();
    assert!(service.load("2024").unwrap().is_empty());
}

#[test]
fn cascade_removes_only_the_removed_subject_ledgers() {
    let store = MemoryKvStore::new();
    let service = SubjectService::new(&store);
    let grades = GradeService::new(&store);
    let notes = NoteService::new(&store);
    service.add("2024", &subject("Math", "7")).unwrap();
    service.add("2024", &subject("History", "5")).unwrap();
    for name in ["Math", "History"] {
        grades.add("2024", name, "8").unwrap();
        notes.add_or_update("2024", name, "revisar", None).unwrap();
    }

    let remaining = service
        .remove_with_mode("2024", "Math", DeleteMode::Cascade)
        .unwrap();

    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "History");
    assert_eq!(store.get("notas_2024_Math").unwrap(), None);
    assert_eq!(store.get("anotacoes_2024_Math").unwrap(), None);
    assert_eq!(grades.load("2024", "History").unwrap().len(), 1);
    assert_eq!(notes.load("2024", "History").unwrap().len(), 1);
}

#[test]
fn cascade_keeps_a_ledger_key_shared_with_another_year() {
    let store = MemoryKvStore::new();
    let service = SubjectService::new(&store);
    let grades = GradeService::new(&store);
    service.add("2024", &subject("A_B", "7")).unwrap();
    service.add("2024_A", &subject("B", "7")).unwrap();
    grades.add("2024_A", "B", "9").unwrap();

    service
        .remove_with_mode("2024", "A_B", DeleteMode::Cascade)
        .unwrap();

    assert!(service.load("2024").unwrap().is_empty());
    assert_eq!(grades.load("2024_A", "B").unwrap().len(), 1);
}

#[test]
fn labels_are_trimmed_on_add_and_remove() {
    let store = MemoryKvStore::new();
    let service = SubjectService::new(&store);
    service.add(" 2024 ", &subject(" Math ", "7")).unwrap();

    assert!(store.get("materias_2024").unwrap().is_some());
    assert_eq!(service.load("2024").unwrap()[0].name, "Math");

    let remaining = service.remove("2024 ", " Math").unwrap();
    assert!(remaining.is_empty());
}
