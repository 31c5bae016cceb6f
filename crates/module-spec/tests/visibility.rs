use serde_json::{Value, json};

use module_spec::{
    FieldDefinition, FieldOption, FieldType, FieldValues, InMemoryCatalog, ModuleFieldEntry,
    ModuleSpec, Operator, evaluate, evaluate_at, required_entries, resolve_visibility,
};

fn catalog() -> InMemoryCatalog {
    let definitions: Vec<FieldDefinition> =
        serde_json::from_str(include_str!("../tests/fixtures/catalog.json"))
            .expect("deserialize catalog");
    InMemoryCatalog::from_definitions(definitions).expect("unique field ids")
}

fn inspection_module() -> ModuleSpec {
    serde_json::from_str(include_str!("../tests/fixtures/inspection_module.json"))
        .expect("deserialize module")
}

fn values(value: Value) -> FieldValues {
    value.as_object().cloned().unwrap_or_default()
}

/// Two-entry module: `parent` of the given field followed by a free-text
/// entry depending on it.
fn pair(parent_field: &str, operator: Operator, literal: &str) -> Vec<ModuleFieldEntry> {
    vec![
        ModuleFieldEntry::new("parent", parent_field),
        ModuleFieldEntry::new("child", "brand").with_dependency("parent", operator, literal),
    ]
}

fn check(parent_field: &str, operator: Operator, literal: &str, answer: Value) -> bool {
    let entries = pair(parent_field, operator, literal);
    let values = if answer.is_null() {
        FieldValues::new()
    } else {
        values(json!({ "parent": answer }))
    };
    evaluate(&entries[1], &entries, &values, &catalog())
}

#[test]
fn entries_without_dependency_are_active() {
    let entries = vec![ModuleFieldEntry::new("brand", "brand")];
    assert!(evaluate(&entries[0], &entries, &FieldValues::new(), &catalog()));
}

#[test]
fn has_ac_scenario() {
    let spec = inspection_module();
    let catalog = catalog();
    let brand = &spec.fields[1];

    assert!(evaluate(brand, &spec.fields, &values(json!({ "ac": true })), &catalog));
    assert!(!evaluate(brand, &spec.fields, &values(json!({ "ac": false })), &catalog));
    assert!(!evaluate(brand, &spec.fields, &FieldValues::new(), &catalog));
}

#[test]
fn checkbox_truth_table() {
    assert!(check("has_ac", Operator::Equals, "true", json!(true)));
    assert!(check("has_ac", Operator::Equals, "true", json!("true")));
    assert!(!check("has_ac", Operator::Equals, "true", json!(false)));
    assert!(!check("has_ac", Operator::Equals, "true", Value::Null));
    assert!(check("has_ac", Operator::Equals, "false", Value::Null));
    assert!(check("has_ac", Operator::NotEquals, "true", json!("false")));
    assert!(!check("has_ac", Operator::Contains, "true", json!(true)));
}

#[test]
fn select_matches_option_label() {
    for (answer, expected) in [
        ("Funcionando", true),
        ("Con fallas menores", false),
        ("Fuera de servicio", false),
    ] {
        assert_eq!(
            check("status", Operator::Equals, "Funcionando", json!(answer)),
            expected,
            "{answer}"
        );
    }
    assert!(check("status", Operator::Equals, "Funcionando", json!("ok")));
    assert!(check("status", Operator::Contains, "fallas", json!("minor")));
    assert!(check("status", Operator::NotEquals, "Funcionando", json!("down")));
}

#[test]
fn multi_select_uses_membership() {
    assert!(check("parts", Operator::Equals, "Drive belt", json!(["filter", "belt"])));
    assert!(!check("parts", Operator::NotEquals, "Drive belt", json!(["belt"])));
    assert!(check("parts", Operator::NotEquals, "Compressor", json!(["filter"])));
    assert!(check("parts", Operator::Contains, "filter", json!(["Air filter"])));
}

#[test]
fn free_text_operators() {
    assert!(check("brand", Operator::Equals, "Carrier", json!("Carrier")));
    assert!(!check("brand", Operator::Equals, "Carrier", json!("carrier")));
    assert!(check("brand", Operator::Contains, "arr", json!("Carrier")));
    assert!(check("brand", Operator::GreaterThan, "B", json!("Carrier")));
    assert!(check("brand", Operator::LessOrEqual, "Carrier", json!("Carrier")));
}

#[test]
fn numbers_compare_numerically() {
    assert!(check("pressure", Operator::GreaterThan, "5", json!(40)));
    assert!(check("pressure", Operator::GreaterThan, "5", json!("40")));
    assert!(check("pressure", Operator::Equals, "40", json!(40.0)));
    assert!(check("pressure", Operator::LessOrEqual, "40", json!("40")));
    assert!(!check("pressure", Operator::LessThan, "5", json!(40)));
}

#[test]
fn unparseable_numbers_hide_the_field() {
    assert!(!check("pressure", Operator::GreaterThan, "5", json!("abc")));
    assert!(!check("pressure", Operator::NotEquals, "5", json!("abc")));
    assert!(!check("pressure", Operator::GreaterThan, "five", json!(10)));
}

#[test]
fn dates_compare_chronologically() {
    assert!(check(
        "last_service",
        Operator::LessThan,
        "2024-06-01",
        json!("2024-05-31T23:59:59Z")
    ));
    assert!(check(
        "last_service",
        Operator::Equals,
        "2024-06-01",
        json!("2024-06-01T02:00:00+02:00")
    ));
    assert!(check(
        "last_service",
        Operator::GreaterOrEqual,
        "2024-06-01",
        json!("2024-06-01")
    ));
    assert!(!check(
        "last_service",
        Operator::GreaterThan,
        "2024-06-01",
        json!("last week")
    ));
}

#[test]
fn unset_parent_only_satisfies_not_equals() {
    assert!(check("brand", Operator::NotEquals, "Carrier", Value::Null));
    assert!(check("brand", Operator::NotEquals, "Carrier", json!("")));
    assert!(!check("brand", Operator::Equals, "Carrier", Value::Null));
    assert!(!check("brand", Operator::Contains, "C", Value::Null));
    assert!(!check("pressure", Operator::GreaterThan, "5", Value::Null));
    assert!(!check("parts", Operator::Contains, "filter", json!([])));
}

#[test]
fn photo_parent_never_activates() {
    assert!(!check("photos", Operator::Equals, "x", json!("x")));
}

#[test]
fn missing_or_later_parent_is_inactive() {
    let catalog = catalog();
    let entries = vec![
        ModuleFieldEntry::new("child", "brand").with_dependency("parent", Operator::Equals, "true"),
        ModuleFieldEntry::new("parent", "has_ac"),
    ];
    let values = values(json!({ "parent": true }));
    assert!(!evaluate(&entries[0], &entries, &values, &catalog));
    assert!(!evaluate_at(0, &entries, &values, &catalog));
}

#[test]
fn unknown_parent_field_is_inactive() {
    let entries = pair("not_in_catalog", Operator::Equals, "x");
    let values = values(json!({ "parent": "x" }));
    assert!(!evaluate_at(1, &entries, &values, &catalog()));
}

#[test]
fn evaluation_is_deterministic() {
    let spec = inspection_module();
    let catalog = catalog();
    let values = values(json!({ "pressure": "150", "status": "down" }));
    for index in 0..spec.fields.len() {
        let first = evaluate_at(index, &spec.fields, &values, &catalog);
        let second = evaluate_at(index, &spec.fields, &values, &catalog);
        assert_eq!(first, second);
    }
}

#[test]
#[should_panic]
fn evaluate_at_rejects_out_of_range_index() {
    let spec = inspection_module();
    evaluate_at(spec.fields.len(), &spec.fields, &FieldValues::new(), &catalog());
}

#[test]
fn visibility_map_covers_every_entry() {
    let spec = inspection_module();
    let map = resolve_visibility(
        &spec.fields,
        &values(json!({ "ac": true, "status": "Funcionando", "pressure": 90 })),
        &catalog(),
    );
    assert_eq!(map.len(), spec.fields.len());
    assert_eq!(map["ac"], true);
    assert_eq!(map["brand"], true);
    assert_eq!(map["status"], true);
    assert_eq!(map["notes"], false);
    assert_eq!(map["pressure"], true);
    assert_eq!(map["photos"], false);
}

#[test]
fn hidden_parent_hides_dependents() {
    let mut catalog = catalog();
    catalog.insert(FieldDefinition {
        id: "cause".into(),
        name: "cause".into(),
        title: "Cause".into(),
        kind: FieldType::SingleSelect {
            options: vec![
                FieldOption {
                    id: "wear".into(),
                    label: "Wear".into(),
                },
                FieldOption {
                    id: "impact".into(),
                    label: "Impact".into(),
                },
            ],
        },
    });
    let entries = vec![
        ModuleFieldEntry::new("ac", "has_ac"),
        ModuleFieldEntry::new("cause", "cause").with_dependency("ac", Operator::Equals, "true"),
        ModuleFieldEntry::new("details", "failure_notes").with_dependency(
            "cause",
            Operator::Equals,
            "Impact",
        ),
    ];
    // The stale cause answer stays in the map after the checkbox is cleared.
    let values = values(json!({ "ac": false, "cause": "impact" }));

    assert!(evaluate_at(2, &entries, &values, &catalog));
    let map = resolve_visibility(&entries, &values, &catalog);
    assert_eq!(map["cause"], false);
    assert_eq!(map["details"], false);
}

#[test]
fn required_entries_skip_inactive_fields() {
    let spec = inspection_module();
    let catalog = catalog();

    let idle = required_entries(&spec.fields, &values(json!({ "status": "ok" })), &catalog);
    assert_eq!(idle, vec!["status".to_string()]);

    let active = required_entries(
        &spec.fields,
        &values(json!({ "ac": "true", "status": "minor" })),
        &catalog,
    );
    assert_eq!(
        active,
        vec!["brand".to_string(), "status".to_string(), "notes".to_string()]
    );
}
