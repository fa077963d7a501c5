use neo4j_provider_core::record;
use neo4j_provider_core::traits::FromBoltValue;
use neo4j_provider_core::value::type_name;
use neo4j_provider_core::ProviderError;
use neo4rs::{BoltList, BoltType, Row};

#[test]
fn test_from_value_string() {
    let val = BoltType::String(neo4rs::BoltString { value: "alice".to_string() });
    let res = String::from_value(val).unwrap();
    assert_eq!(res, "alice");
}

#[test]
fn test_from_value_bool() {
    let val = BoltType::Boolean(neo4rs::BoltBoolean { value: true });
    assert!(bool::from_value(val).unwrap());
}

#[test]
fn test_from_value_list_of_roles() {
    let val = BoltType::List(BoltList {
        value: vec![BoltType::from("PUBLIC"), BoltType::from("admin")],
    });
    let res = Vec::<String>::from_value(val).unwrap();
    assert_eq!(res, vec!["PUBLIC", "admin"]);
}

#[test]
fn test_from_value_option() {
    let val = BoltType::Null(neo4rs::BoltNull);
    assert_eq!(Option::<bool>::from_value(val).unwrap(), None);

    let val = BoltType::Boolean(neo4rs::BoltBoolean { value: false });
    assert_eq!(Option::<bool>::from_value(val).unwrap(), Some(false));
}

#[test]
fn test_type_mismatch_error() {
    let val = BoltType::String(neo4rs::BoltString { value: "yes".to_string() });
    let err = bool::from_value(val).unwrap_err();
    match &err {
        ProviderError::TypeMismatch { expected, got, .. } => {
            assert_eq!(expected, "Boolean");
            assert_eq!(got, "String");
        }
        other => panic!("expected TypeMismatch, got: {other}"),
    }
}

#[test]
fn test_list_element_mismatch() {
    let val = BoltType::List(BoltList {
        value: vec![BoltType::from("PUBLIC"), BoltType::from(1)],
    });
    assert!(Vec::<String>::from_value(val).is_err());
}

#[test]
fn test_type_name() {
    assert_eq!(type_name(&BoltType::from("x")), "String");
    assert_eq!(type_name(&BoltType::Null(neo4rs::BoltNull)), "Null");
}

fn show_users_row() -> Row {
    let fields = BoltList::from(vec![
        BoltType::from("user"),
        BoltType::from("passwordChangeRequired"),
        BoltType::from("home"),
    ]);
    let data = BoltList::from(vec![
        BoltType::from("alice"),
        BoltType::from(true),
        BoltType::Null(neo4rs::BoltNull),
    ]);
    Row::new(fields, data)
}

#[test]
fn test_record_required_and_optional() {
    let row = show_users_row();
    let user: String = record::required(&row, "user", "UserRow").unwrap();
    assert_eq!(user, "alice");

    let home: Option<String> = record::optional(&row, "home", "UserRow").unwrap();
    assert_eq!(home, None);

    let suspended: Option<bool> = record::optional(&row, "suspended", "UserRow").unwrap();
    assert_eq!(suspended, None);
    assert!(record::get_value(&row, "suspended").is_none());
}

#[test]
fn test_record_missing_required_column() {
    let row = show_users_row();
    let err = record::required::<Vec<String>>(&row, "roles", "UserRow").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("roles"));
    assert!(msg.contains("UserRow"));
}

#[test]
fn test_record_wrong_type_carries_context() {
    let row = show_users_row();
    let err = record::required::<bool>(&row, "user", "UserRow").unwrap_err();
    assert_eq!(
        err.to_string(),
        "UserRow::user: type mismatch: expected Boolean, got String (bool)"
    );
}
