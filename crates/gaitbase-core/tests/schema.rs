use gaitbase_core::error::CoreError;
use gaitbase_core::field::{FieldKind, FieldSpec, FieldValue};
use gaitbase_core::labels;
use gaitbase_core::schema::FieldSchema;

#[test]
fn default_values_per_kind() {
    assert_eq!(
        FieldSpec::numeric("a", "°").default_value(),
        FieldValue::text(labels::NOT_MEASURED)
    );
    assert_eq!(FieldSpec::free_text("b").default_value(), FieldValue::text(""));
    assert_eq!(
        FieldSpec::checkbox("c").default_value(),
        FieldValue::text(labels::NO)
    );
    assert_eq!(
        FieldSpec::choice("d", ["Ei mitattu", "+", "++"]).default_value(),
        FieldValue::text("Ei mitattu")
    );
    assert_eq!(
        FieldSpec::choice("e", ["NR", "+"]).with_neutral("+").default_value(),
        FieldValue::text("+")
    );
}

#[test]
fn loads_schema_from_json() {
    let schema = FieldSchema::from_json(
        r#"[
            { "name": "LonkkaFleksioOik", "kind": "numeric", "unit": "°" },
            { "name": "cmtLonkkaPROM", "kind": "free_text" },
            { "name": "EMGSol", "kind": "choice", "choices": ["Kyllä", "EI"] }
        ]"#,
    )
    .unwrap();

    assert_eq!(schema.len(), 3);
    assert_eq!(schema.get("cmtLonkkaPROM").unwrap().kind, FieldKind::FreeText);
    assert_eq!(
        schema.get("EMGSol").unwrap().default_value(),
        FieldValue::text(labels::NO)
    );
    let names = schema.report_names();
    assert!(names.contains(&"TiedotNimi"));
    assert!(names.contains(&"EMGSol"));
}

#[test]
fn loads_schema_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(&path, r#"[{ "name": "AntropPaino", "kind": "numeric", "unit": "kg" }]"#)
        .unwrap();

    let schema = FieldSchema::load(&path).unwrap();
    assert!(schema.contains("AntropPaino"));

    let missing = FieldSchema::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(missing, CoreError::Io { .. }));
}

#[test]
fn duplicate_names_rejected() {
    let err = FieldSchema::new(vec![
        FieldSpec::free_text("cmtTiedot"),
        FieldSpec::free_text("cmtTiedot"),
    ])
    .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateField(name) if name == "cmtTiedot"));
}

#[test]
fn identity_names_are_reserved() {
    assert!(FieldSchema::new(vec![FieldSpec::free_text("TiedotNimi")]).is_err());
}

#[test]
fn choice_needs_valid_neutral() {
    let err = FieldSchema::new(vec![FieldSpec::choice("x", ["a", "b"]).with_neutral("c")]);
    assert!(matches!(err, Err(CoreError::InvalidSpec { .. })));
}

#[test]
fn derived_inputs_must_be_numeric() {
    let err = FieldSchema::new(vec![
        FieldSpec::free_text("cmt"),
        FieldSpec::numeric("Paino", "kg"),
        FieldSpec::numeric("Norm", "").derived_from("cmt", "Paino"),
    ]);
    assert!(matches!(err, Err(CoreError::InvalidSpec { field, .. }) if field == "Norm"));
}
