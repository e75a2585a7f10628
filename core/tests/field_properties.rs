use field_schema_core::*;
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_drafts() -> Vec<FieldDraft> {
    vec![
        FieldDraft::named("quantity", Datatype::Int)
            .with_int_range("1", "500")
            .mark_required(),
        FieldDraft::named("code", Datatype::String)
            .with_description("Short product code")
            .with_length_bounds("2", "8")
            .with_default_value("ABC"),
        FieldDraft::named("archived", Datatype::Boolean).with_boolean_default(false),
        FieldDraft::named("price", Datatype::Number).mark_nullable(),
        FieldDraft::named("size", Datatype::Enum)
            .with_enum_member("S", MemberType::String)
            .with_enum_member("M", MemberType::String)
            .with_enum_member("42", MemberType::Int),
        FieldDraft::named("tags", Datatype::Array),
    ]
}

// ---------------------------------------------------------------------------
// Whole-draft properties
// ---------------------------------------------------------------------------

#[test]
fn validate_is_idempotent() {
    let mut drafts = sample_drafts();
    drafts.push(FieldDraft::new());
    drafts.push(FieldDraft::named("n", Datatype::Int).with_int_range("9", "1"));

    for draft in &drafts {
        assert_eq!(validate(draft), validate(draft));
    }
}

#[test]
fn validated_spec_round_trips_through_draft() {
    for draft in sample_drafts() {
        let first = validate(&draft).unwrap();
        let second = validate(&FieldDraft::from(&first.spec)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn every_datatype_is_accepted_by_a_minimal_draft() {
    for datatype in Datatype::ALL {
        let mut draft = FieldDraft::named("field", datatype);
        if datatype == Datatype::Enum {
            draft.enum_members.push("only", MemberType::String);
        }
        let validated = validate(&draft).unwrap();
        assert_eq!(validated.spec.datatype(), datatype);
        assert_eq!(
            validated.notices.is_empty(),
            profile_for(datatype).implemented
        );
    }
}

#[test]
fn required_and_nullable_may_both_be_set() {
    let draft = FieldDraft::named("note", Datatype::String)
        .mark_required()
        .mark_nullable();
    let spec = validate(&draft).unwrap().spec;
    assert!(spec.required && spec.nullable);
}

// ---------------------------------------------------------------------------
// Datatype switching
// ---------------------------------------------------------------------------

#[test]
fn datatype_switch_keeps_values_for_switching_back() {
    let mut store = FieldDefinitionStore::with_draft(
        FieldDraft::named("level", Datatype::Int).with_int_range("1", "3"),
    );

    store.draft_mut().datatype = Some(Datatype::Boolean);
    let accepted = store.submit().unwrap().clone();
    assert_eq!(
        accepted.spec.constraints,
        Constraints::Boolean {
            boolean_default: true
        }
    );

    store.draft_mut().datatype = Some(Datatype::Int);
    let accepted = store.submit().unwrap();
    assert_eq!(
        accepted.spec.constraints,
        Constraints::Int {
            start_value: Some(1.0),
            end_value: Some(3.0),
        }
    );
}

#[test]
fn inactive_invalid_attributes_do_not_block() {
    let draft = FieldDraft::named("level", Datatype::Boolean)
        .with_int_range("3", "1")
        .with_length_bounds("9", "1")
        .with_default_value("far too long");
    assert!(validate(&draft).is_ok());
}

// ---------------------------------------------------------------------------
// Enum editing flow
// ---------------------------------------------------------------------------

#[test]
fn enum_becomes_valid_after_adding_a_value() {
    let mut store = FieldDefinitionStore::with_draft(FieldDraft::named("status", Datatype::Enum));
    let errors = store.submit().unwrap_err();
    assert_eq!(
        errors.kinds(),
        vec![&ErrorKind::Required(AttributeName::EnumValues)]
    );

    let id = store.draft_mut().enum_members.add().id;
    let errors = store.submit().unwrap_err();
    assert_eq!(
        errors.kinds(),
        vec![&ErrorKind::Required(AttributeName::EnumValue)]
    );
    assert_eq!(errors.errors()[0].member, Some(id));

    store
        .draft_mut()
        .enum_members
        .update(id, EnumMemberPatch::value("X"));
    let accepted = store.submit().unwrap();
    assert_eq!(
        accepted.spec.constraints,
        Constraints::Enum {
            enum_values: vec![EnumValue::new("X", MemberType::Int)],
        }
    );
}

#[test]
fn enum_duplicate_resolved_by_removal() {
    let mut draft = FieldDraft::named("grade", Datatype::Enum);
    draft.enum_members.push("A", MemberType::String);
    let repeat = draft.enum_members.push("A", MemberType::String);

    let errors = validate(&draft).unwrap_err();
    assert_eq!(errors.kinds(), vec![&ErrorKind::Duplicate("A".into())]);

    draft.enum_members.remove(repeat);
    assert!(validate(&draft).is_ok());
}

// ---------------------------------------------------------------------------
// Document mapping
// ---------------------------------------------------------------------------

#[test]
fn validated_serializes_with_notices() {
    let validated = validate(&FieldDraft::named("tags", Datatype::Array)).unwrap();
    let json = serde_json::to_value(&validated).unwrap();

    assert_eq!(json["spec"]["datatype"], "Array");
    assert_eq!(json["notices"][0]["attribute"], "datatype");
    assert_eq!(
        json["notices"][0]["message"],
        "Array fields are not implemented yet."
    );

    let back: Validated = serde_json::from_value(json).unwrap();
    assert_eq!(back, validated);
}
