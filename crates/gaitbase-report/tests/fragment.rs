use std::collections::{BTreeMap, BTreeSet};

use gaitbase_report::error::ReportError;
use gaitbase_report::fragment::{Fragment, Segment, conditional_format};
use gaitbase_report::tables::{CleanupTable, RewriteTable};

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn defaults(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn format(text: &str, values: &BTreeMap<String, String>, defaults: &BTreeSet<String>) -> String {
    conditional_format(&Fragment::parse(text).unwrap(), values, defaults).unwrap()
}

#[test]
fn parses_placeholders_and_escapes() {
    let fragment = Fragment::parse("MAS {{soleus}}: {Foo}/{Bar}").unwrap();
    assert_eq!(
        fragment.segments(),
        &[
            Segment::Literal("MAS {soleus}: ".to_string()),
            Segment::Field("Foo".to_string()),
            Segment::Literal("/".to_string()),
            Segment::Field("Bar".to_string()),
        ]
    );
    assert_eq!(fragment.fields().collect::<Vec<_>>(), ["Foo", "Bar"]);
}

#[test]
fn malformed_placeholders_are_syntax_errors() {
    for text in ["Paino: {AntropPaino", "a } b", "{}", "{a{b}}"] {
        assert!(Fragment::parse(text).is_err(), "{text:?} should not parse");
    }
    let err = Fragment::parse("abc {x").unwrap_err();
    assert_eq!(err.offset, 4);
}

#[test]
fn all_default_fields_suppress_fragment() {
    let v = values(&[("Foo", "Ei mitattu"), ("Bar", "Ei mitattu")]);
    assert_eq!(format("MAS: {Foo}/{Bar}", &v, &defaults(&["Foo", "Bar"])), "");
}

#[test]
fn one_real_value_keeps_whole_fragment() {
    let v = values(&[("Foo", "2"), ("Bar", "Ei mitattu")]);
    assert_eq!(
        format("MAS: {Foo}/{Bar}", &v, &defaults(&["Bar"])),
        "MAS: 2/Ei mitattu"
    );
}

#[test]
fn fragment_without_fields_is_always_kept() {
    let v = values(&[("Foo", "x")]);
    assert_eq!(
        format("NR = Normaalirajoissa\n", &v, &defaults(&["Foo"])),
        "NR = Normaalirajoissa\n"
    );
    assert_eq!(format("{{Foo}}", &v, &defaults(&["Foo"])), "{Foo}");
}

#[test]
fn keeps_fragment_when_date_is_set() {
    let v = values(&[("AntropPaino", "Ei mitattu"), ("TiedotPvm", "01.01.2024")]);
    assert_eq!(
        format("Paino: {AntropPaino} kg, pvm {TiedotPvm}", &v, &defaults(&["AntropPaino"])),
        "Paino: Ei mitattu kg, pvm 01.01.2024"
    );
}

#[test]
fn unknown_field_is_reported_by_name() {
    let v = values(&[("Foo", "1")]);
    let err = conditional_format(
        &Fragment::parse("{Foo} {Zorblex} {Zorblex}").unwrap(),
        &v,
        &defaults(&[]),
    )
    .unwrap_err();
    match &err {
        ReportError::UnknownFields { names } => assert_eq!(names, &["Zorblex".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Zorblex"));
}

#[test]
fn unknown_field_reported_even_if_rest_is_default() {
    let v = values(&[("Foo", "Ei mitattu")]);
    let result = conditional_format(
        &Fragment::parse("{Foo}/{Zorblex}").unwrap(),
        &v,
        &defaults(&["Foo", "Zorblex"]),
    );
    assert!(matches!(result, Err(ReportError::UnknownFields { .. })));
}

#[test]
fn literals_replace_named_placeholders() {
    let fragment = Fragment::parse("catch {Catch}{klonus}/{Other}").unwrap();
    let literals = values(&[("klonus", " ({not a field})")]);
    let resolved = fragment.with_literals(&literals);

    assert_eq!(resolved.fields().collect::<Vec<_>>(), ["Catch", "Other"]);
    let v = values(&[("Catch", "10°"), ("Other", "5°")]);
    assert_eq!(
        conditional_format(&resolved, &v, &defaults(&[])).unwrap(),
        "catch 10° ({not a field})/5°"
    );
}

#[test]
fn rewrite_table_copies_values() {
    let table = RewriteTable::new([("Ei mitattu", "-"), ("EI", "Ei")]);
    let v = values(&[("a", "Ei mitattu"), ("b", "EI"), ("c", "EI mitattu")]);
    let rewritten = table.apply(&v);

    assert_eq!(rewritten["a"], "-");
    assert_eq!(rewritten["b"], "Ei");
    assert_eq!(rewritten["c"], "EI mitattu");
    assert_eq!(v["a"], "Ei mitattu");
}

#[test]
fn cleanup_table_replaces_substrings() {
    let table = CleanupTable::new([("(EI)", ""), ("(Kyllä)", "(kl.)")]);
    assert_eq!(table.apply("10°(EI)/12°(Kyllä)"), "10°/12°(kl.)");
}
