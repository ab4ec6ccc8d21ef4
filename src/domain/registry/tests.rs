use test_case::test_case;

use super::*;
use crate::{
    domain::SequentialIds,
    storage::{JsonDirectory, MemoryGateway, Snapshot},
};

fn seeded() -> Registry<MemoryGateway> {
    Registry::open_with(MemoryGateway::new(), Box::new(SequentialIds::new()), true).unwrap()
}

fn empty() -> Registry<MemoryGateway> {
    Registry::open_with(MemoryGateway::new(), Box::new(SequentialIds::new()), false).unwrap()
}

fn named<'a, T: Table, G: Gateway>(registry: &'a Registry<G>, name: &str) -> &'a T
where
    T: NamedRow,
{
    registry
        .list::<T>()
        .iter()
        .find(|row| row.row_name() == name)
        .unwrap()
}

trait NamedRow {
    fn row_name(&self) -> &str;
}

impl NamedRow for CourseType {
    fn row_name(&self) -> &str {
        self.name()
    }
}

impl NamedRow for Course {
    fn row_name(&self) -> &str {
        self.name()
    }
}

fn ada() -> StudentDraft {
    StudentDraft::new("Ada Lovelace", "ada@example.com", "555-0100")
}

fn english_group<G: Gateway>(registry: &mut Registry<G>) -> CourseOffering {
    let english = named::<Course, _>(registry, "English").id().clone();
    let group = named::<CourseType, _>(registry, "Group").id().clone();
    registry
        .add_course_offering(OfferingDraft::new(english, group))
        .unwrap()
}

#[test]
fn first_open_seeds_defaults() {
    let registry = seeded();

    let course_types: Vec<_> = registry.course_types().iter().map(|t| t.name().as_str()).collect();
    let courses: Vec<_> = registry.courses().iter().map(|c| c.name().as_str()).collect();

    assert_eq!(course_types, ["Individual", "Group", "Special"]);
    assert_eq!(courses, ["English", "Hindi", "Urdu"]);
    assert_eq!(registry.gateway().snapshot().course_types.as_ref().map(Vec::len), Some(3));
    assert_eq!(registry.gateway().snapshot().courses.as_ref().map(Vec::len), Some(3));
}

#[test]
fn stored_empty_collections_are_not_reseeded() {
    let gateway = MemoryGateway::with_snapshot(Snapshot {
        course_types: Some(Vec::new()),
        courses: Some(Vec::new()),
        ..Snapshot::default()
    });
    let registry = Registry::open_with(gateway, Box::new(SequentialIds::new()), true).unwrap();

    assert!(registry.course_types().is_empty());
    assert!(registry.courses().is_empty());
    assert_eq!(registry.gateway().writes(), 0);
}

#[test]
fn seeding_can_be_disabled() {
    let registry = empty();
    assert_eq!(registry.stats(), Stats::default());
}

#[test]
fn add_then_find_returns_the_row() {
    let mut registry = empty();
    let added = registry.add_course("  Persian ").unwrap();

    let found = registry.find::<Course>(added.id()).unwrap();
    assert_eq!(found, &added);
    assert_eq!(found.name(), "Persian");

    let again = registry.get::<Course>(added.id()).unwrap();
    assert_eq!(again.id(), added.id());
    assert_eq!(again.created_at(), added.created_at());
}

#[test]
fn get_unknown_id_is_not_found() {
    let registry = empty();
    let error = registry.get::<Student>(&Id::from("7")).unwrap_err();
    assert_eq!(
        error,
        Error::NotFound {
            kind: EntityKind::Student,
            id: Id::from("7"),
        }
    );
}

#[test_case(""; "empty")]
#[test_case("   "; "blank")]
#[test_case(" x "; "too short")]
fn invalid_catalogue_names_are_rejected(name: &str) {
    let mut registry = empty();

    let error = registry.add_course_type(name).unwrap_err();
    assert_eq!(error.violations().unwrap().for_field(Field::Name).count(), 1);
    assert!(registry.add_course(name).is_err());
    assert_eq!(registry.stats(), Stats::default());
}

#[test]
fn update_keeps_id_and_created_at() {
    let mut registry = seeded();
    let hindi = named::<Course, _>(&registry, "Hindi").clone();

    let renamed = registry.update_course(hindi.id(), "Hindustani").unwrap();

    assert_eq!(renamed.id(), hindi.id());
    assert_eq!(renamed.created_at(), hindi.created_at());
    assert_eq!(renamed.name(), "Hindustani");
    assert_eq!(registry.courses()[1], renamed);
}

#[test]
fn update_unknown_row_is_not_found() {
    let mut registry = seeded();
    let missing = Id::from("missing");

    assert!(matches!(
        registry.update_course_type(&missing, "Online"),
        Err(Error::NotFound { kind: EntityKind::CourseType, .. })
    ));
    assert!(matches!(
        registry.update_student(&missing, &StudentPatch::default()),
        Err(Error::NotFound { kind: EntityKind::Student, .. })
    ));
    assert!(matches!(
        registry.update_course_offering(&missing, OfferingPatch::default()),
        Err(Error::NotFound { kind: EntityKind::CourseOffering, .. })
    ));
}

#[test]
fn invalid_rename_leaves_row_unchanged() {
    let mut registry = seeded();
    let before = registry.course_types().to_vec();
    let id = before[0].id().clone();

    assert!(registry.update_course_type(&id, "I").is_err());
    assert_eq!(registry.course_types(), before.as_slice());
}

#[test]
fn offering_copies_names() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);

    assert_eq!(offering.course_name(), "English");
    assert_eq!(offering.course_type_name(), "Group");
    assert_eq!(offering.label(), "Group - English");
}

#[test]
fn offering_with_dangling_references_is_rejected() {
    let mut registry = seeded();
    let before = registry.course_offerings().to_vec();

    let error = registry
        .add_course_offering(OfferingDraft::new("no-such-course", "no-such-type"))
        .unwrap_err();

    let violations = error.violations().unwrap();
    assert!(violations.has_dangling_reference());
    assert_eq!(violations.len(), 2);
    assert_eq!(violations.for_field(Field::Course).count(), 1);
    assert_eq!(violations.for_field(Field::CourseType).count(), 1);
    assert_eq!(registry.course_offerings(), before.as_slice());
}

#[test]
fn offering_with_one_dangling_reference_is_rejected() {
    let mut registry = seeded();
    let english = named::<Course, _>(&registry, "English").id().clone();

    let error = registry
        .add_course_offering(OfferingDraft::new(english, "no-such-type"))
        .unwrap_err();

    assert_eq!(
        error,
        Error::from(Violation::DanglingReference {
            field: Field::CourseType,
            kind: EntityKind::CourseType,
            id: Id::from("no-such-type"),
        })
    );
    assert!(registry.course_offerings().is_empty());
}

#[test]
fn blank_offering_references_are_required() {
    let registry = seeded();
    let violations = registry
        .validate_offering(&Id::from(""), &Id::from(""))
        .unwrap_err();

    assert_eq!(
        violations.into_iter().collect::<Vec<_>>(),
        vec![
            Violation::Required {
                field: Field::Course
            },
            Violation::Required {
                field: Field::CourseType
            },
        ]
    );
}

#[test]
fn renaming_a_course_does_not_touch_offerings() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);

    registry
        .update_course(offering.course_id(), "British English")
        .unwrap();

    let stored = registry.get::<CourseOffering>(offering.id()).unwrap();
    assert_eq!(stored.course_name(), "English");
}

#[test]
fn editing_an_offering_repairs_and_refreshes_names() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);
    registry
        .update_course_type(offering.course_type_id(), "Small Group")
        .unwrap();
    let urdu = named::<Course, _>(&registry, "Urdu").id().clone();

    let edited = registry
        .update_course_offering(
            offering.id(),
            OfferingPatch {
                course_id: Some(urdu.clone()),
                course_type_id: None,
            },
        )
        .unwrap();

    assert_eq!(edited.id(), offering.id());
    assert_eq!(edited.course_id(), &urdu);
    assert_eq!(edited.course_type_id(), offering.course_type_id());
    assert_eq!(edited.course_name(), "Urdu");
    assert_eq!(edited.course_type_name(), "Small Group");
}

#[test]
fn editing_an_offering_to_a_dangling_pairing_is_rejected() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);

    let error = registry
        .update_course_offering(
            offering.id(),
            OfferingPatch {
                course_id: Some(Id::from("gone")),
                course_type_id: None,
            },
        )
        .unwrap_err();

    assert!(error.violations().unwrap().has_dangling_reference());
    assert_eq!(registry.course_offerings(), [offering].as_slice());
}

#[test]
fn student_violations_are_reported_together() {
    let mut registry = empty();
    let error = registry
        .add_student(&StudentDraft::new(" ", "ada-at-example", ""))
        .unwrap_err();

    let violations = error.violations().unwrap();
    assert_eq!(violations.len(), 3);
    assert!(registry.students().is_empty());
}

#[test]
fn student_patch_is_validated() {
    let mut registry = empty();
    let student = registry.add_student(&ada()).unwrap();

    let error = registry
        .update_student(
            student.id(),
            &StudentPatch {
                email: Some("nope".to_string()),
                ..StudentPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        error,
        Error::from(Violation::Malformed {
            field: Field::Email
        })
    );

    let updated = registry
        .update_student(
            student.id(),
            &StudentPatch {
                email: Some("ada@lovelace.org".to_string()),
                ..StudentPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.email(), "ada@lovelace.org");
    assert_eq!(updated.name(), "Ada Lovelace");
}

#[test]
fn registration_snapshots_student_and_offering() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);
    let student = registry.add_student(&ada()).unwrap();

    let registration = registry
        .register(RegistrationDraft::existing(student.id().clone(), offering.id().clone()))
        .unwrap();

    assert_eq!(registration.student_id(), student.id());
    assert_eq!(registration.course_offering_id(), offering.id());
    assert_eq!(registration.student(), &student);
    assert_eq!(registration.course_offering(), &offering);
    assert_eq!(registration.created_at(), registration.registration_date());
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);
    let student = registry.add_student(&ada()).unwrap();
    let draft = RegistrationDraft::existing(student.id().clone(), offering.id().clone());

    registry.register(draft.clone()).unwrap();
    let before = registry.registrations().to_vec();
    let error = registry.register(draft).unwrap_err();

    assert_eq!(
        error,
        Error::from(Violation::DuplicateRegistration {
            student_id: student.id().clone(),
            course_offering_id: offering.id().clone(),
        })
    );
    assert_eq!(registry.registrations(), before.as_slice());
}

#[test]
fn same_student_may_register_for_other_offerings() {
    let mut registry = seeded();
    let first = english_group(&mut registry);
    let hindi = named::<Course, _>(&registry, "Hindi").id().clone();
    let group = named::<CourseType, _>(&registry, "Group").id().clone();
    let second = registry
        .add_course_offering(OfferingDraft::new(hindi, group))
        .unwrap();
    let student = registry.add_student(&ada()).unwrap();

    for offering in [&first, &second] {
        registry
            .register(RegistrationDraft::existing(student.id().clone(), offering.id().clone()))
            .unwrap();
    }
    assert_eq!(registry.registrations().len(), 2);
}

#[test]
fn new_student_path_creates_student_and_registration() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);

    let registration = registry
        .register(RegistrationDraft::new_student(ada(), offering.id().clone()))
        .unwrap();

    assert_eq!(registry.students().len(), 1);
    let student = &registry.students()[0];
    assert_eq!(registration.student_id(), student.id());
    assert_eq!(registration.student(), student);
}

#[test]
fn new_student_path_skips_duplicate_check() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);

    // The same person entered twice becomes two students, each registered
    // once.
    for _ in 0..2 {
        registry
            .register(RegistrationDraft::new_student(ada(), offering.id().clone()))
            .unwrap();
    }

    assert_eq!(registry.students().len(), 2);
    assert_eq!(registry.registrations().len(), 2);
    assert_ne!(
        registry.registrations()[0].student_id(),
        registry.registrations()[1].student_id()
    );
}

#[test]
fn invalid_new_student_commits_nothing() {
    let mut registry = seeded();

    let error = registry
        .register(RegistrationDraft::new_student(
            StudentDraft::new("", "bad", ""),
            "no-such-offering",
        ))
        .unwrap_err();

    let violations = error.violations().unwrap();
    assert_eq!(violations.len(), 4);
    assert!(violations.has_dangling_reference());
    assert!(registry.students().is_empty());
    assert!(registry.registrations().is_empty());
}

#[test]
fn valid_new_student_with_dangling_offering_commits_nothing() {
    let mut registry = seeded();

    assert!(
        registry
            .register(RegistrationDraft::new_student(ada(), "no-such-offering"))
            .is_err()
    );
    assert!(registry.students().is_empty());
}

#[test]
fn existing_student_must_resolve() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);

    let violations = registry
        .validate_registration(&StudentRef::Existing(Id::from("ghost")), offering.id())
        .unwrap_err();

    assert_eq!(
        violations.into_iter().collect::<Vec<_>>(),
        vec![Violation::DanglingReference {
            field: Field::Student,
            kind: EntityKind::Student,
            id: Id::from("ghost"),
        }]
    );
}

#[test_case(EntityKind::CourseType; "course type")]
#[test_case(EntityKind::Course; "course")]
#[test_case(EntityKind::CourseOffering; "course offering")]
#[test_case(EntityKind::Student; "student")]
#[test_case(EntityKind::Registration; "registration")]
fn remove_is_idempotent(kind: EntityKind) {
    let mut registry = seeded();
    let offering = english_group(&mut registry);
    let registration = registry
        .register(RegistrationDraft::new_student(ada(), offering.id().clone()))
        .unwrap();

    let id = match kind {
        EntityKind::CourseType => offering.course_type_id().clone(),
        EntityKind::Course => offering.course_id().clone(),
        EntityKind::CourseOffering => offering.id().clone(),
        EntityKind::Student => registration.student_id().clone(),
        EntityKind::Registration => registration.id().clone(),
    };
    let remove = |registry: &mut Registry<MemoryGateway>| match kind {
        EntityKind::CourseType => registry.remove::<CourseType>(&id),
        EntityKind::Course => registry.remove::<Course>(&id),
        EntityKind::CourseOffering => registry.remove::<CourseOffering>(&id),
        EntityKind::Student => registry.remove::<Student>(&id),
        EntityKind::Registration => registry.remove::<Registration>(&id),
    };

    assert!(remove(&mut registry));
    let once = registry.tables.clone();
    let writes = registry.gateway().writes();

    assert!(!remove(&mut registry));
    assert_eq!(registry.tables, once);
    assert_eq!(registry.gateway().writes(), writes);
}

#[test]
fn removal_does_not_cascade() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);
    let registration = registry
        .register(RegistrationDraft::new_student(ada(), offering.id().clone()))
        .unwrap();

    registry.remove::<Course>(offering.course_id());
    registry.remove::<Student>(registration.student_id());

    assert_eq!(registry.course_offerings().len(), 1);
    assert_eq!(registry.registrations().len(), 1);
    assert_eq!(
        registry.orphans(),
        vec![
            Orphan {
                kind: EntityKind::CourseOffering,
                id: offering.id().clone(),
                field: Field::Course,
                target: EntityKind::Course,
                missing: offering.course_id().clone(),
            },
            Orphan {
                kind: EntityKind::Registration,
                id: registration.id().clone(),
                field: Field::Student,
                target: EntityKind::Student,
                missing: registration.student_id().clone(),
            },
        ]
    );
}

#[test]
fn every_mutation_is_persisted() {
    let mut registry = empty();
    let course = registry.add_course("English").unwrap();
    registry.update_course(course.id(), "Spanish").unwrap();

    let stored = registry.gateway().snapshot().courses.clone().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name(), "Spanish");
    assert_eq!(registry.gateway().writes(), 2);

    registry.remove::<Course>(course.id());
    assert_eq!(registry.gateway().snapshot().courses, Some(Vec::new()));
}

#[test]
fn rejected_mutations_are_not_persisted() {
    let mut registry = empty();
    assert!(registry.add_course("E").is_err());
    assert!(
        registry
            .add_course_offering(OfferingDraft::new("1", "2"))
            .is_err()
    );
    assert_eq!(registry.gateway().writes(), 0);
}

#[test]
fn reopening_restores_rows_and_avoids_id_reuse() {
    let mut registry = seeded();
    let offering = english_group(&mut registry);
    let registration = registry
        .register(RegistrationDraft::new_student(ada(), offering.id().clone()))
        .unwrap();
    // The student's id now only survives as a foreign key.
    registry.remove::<Student>(registration.student_id());

    let gateway = registry.into_gateway();
    let mut reopened =
        Registry::open_with(gateway, Box::new(SequentialIds::new()), true).unwrap();

    assert_eq!(reopened.course_types().len(), 3);
    assert_eq!(reopened.course_offerings(), [offering].as_slice());
    assert!(reopened.students().is_empty());
    assert_eq!(reopened.registrations(), [registration.clone()].as_slice());

    let student = reopened.add_student(&ada()).unwrap();
    assert_ne!(student.id(), registration.student_id());
    assert_ne!(student.id(), registration.id());
}

#[test]
fn registration_snapshot_survives_reopening_a_data_directory() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let open = || {
        Registry::open_with(
            JsonDirectory::new(tmp_dir.path().to_path_buf()),
            Box::new(SequentialIds::new()),
            true,
        )
        .unwrap()
    };

    let mut registry = open();
    let offering = english_group(&mut registry);
    let registration = registry
        .register(RegistrationDraft::new_student(ada(), offering.id().clone()))
        .unwrap();
    assert!(registry.remove::<CourseOffering>(offering.id()));
    drop(registry);

    let reopened = open();
    assert!(reopened.course_offerings().is_empty());
    assert_eq!(reopened.students().len(), 1);

    let restored = reopened.find::<Registration>(registration.id()).unwrap();
    assert_eq!(restored, &registration);
    assert_eq!(restored.course_offering_id(), offering.id());
    assert_eq!(restored.course_offering().course_name().as_str(), "English");
    assert_eq!(restored.course_offering().course_type_name().as_str(), "Group");
    assert_eq!(restored.student().name().as_str(), "Ada Lovelace");
    assert_eq!(restored.student().email().as_str(), "ada@example.com");
    assert_eq!(restored.registration_date(), registration.registration_date());
}

#[test]
fn queries_filter_and_order() {
    let mut registry = seeded();
    let group_english = english_group(&mut registry);
    let urdu = named::<Course, _>(&registry, "Urdu").id().clone();
    let special = named::<CourseType, _>(&registry, "Special").id().clone();
    let special_urdu = registry
        .add_course_offering(OfferingDraft::new(urdu, special.clone()))
        .unwrap();

    let of_type: Vec<_> = registry.offerings_of_type(&special).collect();
    assert_eq!(of_type, [&special_urdu]);

    for name in ["A1", "B2", "C3"] {
        let draft = StudentDraft::new(name, format!("{name}@example.com"), "1");
        registry
            .register(RegistrationDraft::new_student(draft, group_english.id().clone()))
            .unwrap();
    }
    registry
        .register(RegistrationDraft::new_student(ada(), special_urdu.id().clone()))
        .unwrap();

    let for_group_english: Vec<_> = registry
        .registrations_for(group_english.id())
        .map(|r| r.student().name().as_str())
        .collect();
    assert_eq!(for_group_english, ["A1", "B2", "C3"]);

    let recent: Vec<_> = registry
        .recent_registrations(2)
        .map(|r| r.student().name().as_str())
        .collect();
    assert_eq!(recent, ["Ada Lovelace", "C3"]);

    assert_eq!(
        registry.stats(),
        Stats {
            course_types: 3,
            courses: 3,
            course_offerings: 2,
            students: 4,
            registrations: 4,
        }
    );
}

#[test]
fn registration_walkthrough() {
    let mut registry = seeded();

    let offering = english_group(&mut registry);
    assert_eq!(offering.course_name(), "English");
    assert_eq!(offering.course_type_name(), "Group");

    let student = registry.add_student(&ada()).unwrap();
    let draft = RegistrationDraft::existing(student.id().clone(), offering.id().clone());
    registry.register(draft.clone()).unwrap();

    let error = registry.register(draft).unwrap_err();
    assert!(error.violations().unwrap().has_duplicate_registration());
    assert_eq!(registry.registrations().len(), 1);

    assert!(registry.remove::<CourseOffering>(offering.id()));
    assert!(registry.find::<CourseOffering>(offering.id()).is_none());

    let registration = &registry.registrations()[0];
    assert_eq!(registration.course_offering().course_name(), "English");
    assert_eq!(registration.course_offering_id(), offering.id());
}

/// Loads nothing and refuses every write.
struct ReadOnly;

impl Gateway for ReadOnly {
    fn load(&mut self) -> Result<crate::storage::Snapshot, GatewayError> {
        Ok(crate::storage::Snapshot::default())
    }

    fn store(&mut self, _collection: Collection<'_>) -> Result<(), GatewayError> {
        Err(GatewayError::Io {
            path: "read-only".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
    }
}

#[test]
fn failed_writes_keep_the_committed_state() {
    let mut registry = Registry::open_with(ReadOnly, Box::new(SequentialIds::new()), true).unwrap();
    assert_eq!(registry.course_types().len(), 3);

    let course = registry.add_course("Persian").unwrap();
    assert_eq!(registry.find::<Course>(course.id()), Some(&course));
}
