#![cfg(feature = "derive")]

use tablemap::{
    BeforeInsert, BeforeUpdate, OrmError, OrmResult, Record, Row, Struct, Table, Value, View,
};

#[derive(Debug, Default, Clone, PartialEq, Record)]
#[orm(table = "people")]
struct Person {
    #[orm(pk)]
    id: i64,
    name: String,
    #[orm(column = "email_address")]
    email: Option<String>,
    #[orm(skip)]
    dirty: bool,
}

#[derive(Debug, Default, Record)]
#[orm(before_insert, before_update)]
struct AuditEntry {
    #[orm(id)]
    entry_id: i32,
    action: String,
    #[orm(skip)]
    hook_calls: u32,
}

impl BeforeInsert for AuditEntry {
    fn before_insert(&mut self) -> OrmResult<()> {
        self.hook_calls += 1;
        if self.action.is_empty() {
            return Err(OrmError::validation("action is required"));
        }
        Ok(())
    }
}

impl BeforeUpdate for AuditEntry {
    fn before_update(&mut self) -> OrmResult<()> {
        self.hook_calls += 10;
        Ok(())
    }
}

#[derive(Debug, Default, tablemap::View)]
#[orm(view = "reporting.active_people")]
struct ActivePerson {
    name: String,
    #[orm(column = "email_address")]
    email: Option<String>,
}

#[derive(Debug, Default, Record)]
#[orm(table = "tokens")]
struct Token {
    #[orm(pk)]
    value: String,
    owner: i64,
}

#[test]
fn table_descriptor_follows_field_order() {
    let table: &'static Table = Person::descriptor();
    assert_eq!(table.name(), "people");
    assert_eq!(table.columns(), &["id", "name", "email_address"]);
    assert_eq!(table.pk_index(), 0);
    assert_eq!(table.pk_column(), "id");
}

#[test]
fn table_name_defaults_to_snake_case() {
    assert_eq!(AuditEntry::descriptor().name(), "audit_entry");
    assert_eq!(AuditEntry::descriptor().columns(), &["entry_id", "action"]);
}

#[test]
fn view_descriptor() {
    let view: &'static View = ActivePerson::descriptor();
    assert_eq!(view.name(), "reporting.active_people");
    assert_eq!(view.columns(), &["name", "email_address"]);

    let mut person = ActivePerson::default();
    assert!(person.as_record_mut().is_none());
    assert!(person.as_before_insert().is_none());
}

#[test]
fn values_in_descriptor_order() {
    let person = Person {
        id: 3,
        name: "Alice".into(),
        email: None,
        dirty: true,
    };
    assert_eq!(
        person.values(),
        vec![Value::Int(3), Value::Text("Alice".into()), Value::Null]
    );
    assert_eq!(person.values().len(), person.view().columns().len());
}

#[test]
fn pk_access() {
    let mut person = Person::default();
    assert!(!person.has_pk());

    person.set_pk(Value::Int(11)).unwrap();
    assert!(person.has_pk());
    assert_eq!(person.id, 11);
    assert_eq!(person.pk_value(), Value::Int(11));

    let err = person.set_pk(Value::Text("eleven".into())).unwrap_err();
    assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "id"));
}

#[test]
fn string_pk_is_unset_when_empty() {
    let mut token = Token::default();
    assert!(!token.has_pk());
    token.set_pk(Value::from("abc")).unwrap();
    assert!(token.has_pk());
    assert_eq!(Token::descriptor().pk_column(), "value");
}

#[test]
fn scan_assigns_mapped_fields_only() {
    let mut person = Person {
        dirty: true,
        ..Person::default()
    };
    person
        .scan(Row::from_values(vec![
            Value::Int(5),
            Value::from("Bob"),
            Value::from("bob@example.com"),
        ]))
        .unwrap();

    assert_eq!(person.id, 5);
    assert_eq!(person.name, "Bob");
    assert_eq!(person.email.as_deref(), Some("bob@example.com"));
    assert!(person.dirty);
}

#[test]
fn scan_failure_leaves_struct_untouched() {
    let mut person = Person::default();
    let err = person
        .scan(Row::new(
            vec!["id".into(), "name".into(), "email_address".into()],
            vec![Value::Int(5), Value::Int(6), Value::Null],
        ))
        .unwrap_err();

    assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "name"));
    assert_eq!(person, Person::default());
}

#[test]
fn scan_checks_width() {
    let mut person = Person::default();
    assert!(person.scan(Row::from_values(vec![Value::Int(1)])).is_err());
}

#[test]
fn capability_queries() {
    let mut person = Person::default();
    assert!(person.as_record_mut().is_some());
    assert!(person.as_before_insert().is_none());
    assert!(person.as_before_update().is_none());

    let mut entry = AuditEntry::default();
    let err = entry.as_before_insert().unwrap().before_insert().unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
    entry.as_before_update().unwrap().before_update().unwrap();
    assert_eq!(entry.hook_calls, 11);
}

#[test]
fn records_are_usable_as_trait_objects() {
    let mut person = Person::default();
    let record: &mut dyn Record = &mut person;
    assert_eq!(record.table().name(), "people");
    let plain: &mut dyn Struct = record;
    assert_eq!(plain.view().name(), "people");
}
