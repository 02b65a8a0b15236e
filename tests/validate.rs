//! Integration coverage against the canonical dog/cat/human/alien schema,
//! exercising the invariants a conforming executable document must
//! satisfy against a type system document.

use gql_validate::{validate, GqlError};
use graphql_parser::{parse_query, parse_schema};
use pretty_assertions::assert_eq;
use unindent::unindent;

fn schema() -> graphql_parser::schema::Document<'static, String> {
    parse_schema::<String>(include_str!("fixtures/dog_schema.graphql"))
        .expect("fixture schema parses")
        .into_static()
}

fn query(src: &str) -> graphql_parser::query::Document<'static, String> {
    parse_query::<String>(&unindent(src))
        .expect("test query parses")
        .into_static()
}

fn errors(src: &str) -> Vec<GqlError> {
    let q = query(src);
    match validate(&q, &schema()) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.into_vec(),
    }
}

#[test]
fn valid_query_round_trips_unchanged() {
    let q = query("{ dog { name barkVolume } }");
    let result = validate(&q, &schema());
    assert!(result.is_ok());
}

#[test]
fn field_must_exist_on_its_parent_type() {
    let errs = errors("{ dog { nickname, nonexistentField } }");
    assert_eq!(errs.len(), 1);
    assert!(matches!(
        &errs[0],
        GqlError::UndefinedField { ty, field }
            if ty == "Dog" && field == "nonexistentField"
    ));
}

#[test]
fn leaf_field_rejects_a_subselection() {
    let errs = errors("{ dog { name { x } } }");
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::UnexpectedSubselection { field, .. } if field == "name")));
}

#[test]
fn composite_field_requires_a_subselection() {
    let errs = errors("{ dog }");
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::MissingSubselection { field, .. } if field == "dog")));
}

#[test]
fn undefined_argument_is_rejected() {
    let errs = errors(
        "fragment f on Dog { doesKnowCommand(unknownArg: SIT) } { dog { ...f } }",
    );
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::UndefinedArgument { argument, .. } if argument == "unknownArg")));
}

#[test]
fn duplicate_argument_is_rejected() {
    let errs = errors(
        "{ arguments { multipleReqs(x: 1, x: 2, y: 3) } }",
    );
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::DuplicateArgumentName(name) if name == "x")));
}

#[test]
fn missing_required_argument_is_rejected() {
    let errs = errors("{ arguments { nonNullBooleanArgField } }");
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::MissingRequiredArgument { argument, .. } if argument == "nonNullBooleanArg"
    )));
}

#[test]
fn optional_argument_may_be_omitted() {
    let errs = errors("{ arguments { booleanArgField } }");
    assert!(errs.is_empty());
}

#[test]
fn explicit_null_for_a_non_null_argument_is_reported_once_as_a_value_error() {
    let errs = errors("{ arguments { nonNullBooleanArgField(nonNullBooleanArg: null) } }");
    assert_eq!(errs.len(), 1);
    assert!(matches!(errs[0], GqlError::IncorrectValueType(_)));
}

#[test]
fn fragment_on_a_scalar_type_is_rejected() {
    let errs = errors(
        "fragment f on Boolean { x } { arguments { nonNullBooleanArgField } }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::NonCompositeFragmentTarget { ty, .. } if ty == "Boolean"
    )));
}

#[test]
fn fragment_on_undefined_type_is_rejected() {
    let errs = errors("fragment f on Ghost { x } { dog { name } }");
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::UndefinedFragmentTarget { ty, .. } if ty == "Ghost"
    )));
}

#[test]
fn fragment_spread_requires_overlapping_types() {
    let errs = errors(
        "fragment onCat on Cat { meowVolume } { dog { ...onCat } }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::ImpossibleFragmentSpread { fragment, .. } if fragment == "onCat"
    )));
}

#[test]
fn fragment_spread_through_an_interface_is_allowed() {
    let errs = errors(
        "fragment petName on Pet { name } { pet { ...petName } }",
    );
    assert!(errs.is_empty());
}

#[test]
fn unused_fragment_is_rejected() {
    let errs = errors(
        "fragment unused on Dog { name } { dog { name } }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::UnusedFragment { fragment } if fragment == "unused"
    )));
}

#[test]
fn cyclic_fragment_spreads_are_rejected() {
    let errs = errors(
        "fragment a on Dog { ...b } fragment b on Dog { ...a } { dog { ...a } }",
    );
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::CyclicFragmentSpread(_))));
}

#[test]
fn spread_of_an_undefined_fragment_is_rejected() {
    let errs = errors("{ dog { ...doesNotExist } }");
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::UndefinedFragment(name) if name == "doesNotExist"
    )));
}

#[test]
fn duplicate_operation_names_are_rejected() {
    let errs = errors(
        "query A { dog { name } } query A { cat { name } }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::DuplicateOperationName(name) if name == "A"
    )));
}

#[test]
fn anonymous_operation_must_be_alone() {
    let errs = errors("{ dog { name } } query Named { cat { name } }");
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::MixedAnonymousOperation)));
}

#[test]
fn subscription_must_select_exactly_one_root_field() {
    let errs = errors(
        "subscription { disallowedSecondRootField disallowedSecondRootField }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::MultipleSubscriptionRoots { found, .. } if *found == 2
    )));
}

#[test]
fn undeclared_variable_is_rejected() {
    let errs = errors(
        "{ arguments { multipleReqs(x: $x, y: 1) } }",
    );
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::UndefinedVariable(name) if name == "x")));
}

#[test]
fn unused_variable_is_rejected() {
    let errs = errors(
        "query Q($unused: Int!) { arguments { multipleReqs(x: 1, y: 2) } }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::UnusedVariable { variable, .. } if variable == "unused"
    )));
}

#[test]
fn duplicate_variable_declaration_is_rejected() {
    let errs = errors(
        "query Q($x: Int!, $x: Int!) { arguments { multipleReqs(x: $x, y: 1) } }",
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::DuplicateVariableName(name) if name == "x"
    )));
}

#[test]
fn variable_declared_with_an_undefined_type_is_rejected() {
    let errs = errors(
        "query Q($x: Ghost) { arguments { multipleReqs(x: 1, y: 2) } }",
    );
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::UndefinedType(name) if name == "Ghost")));
}

#[test]
fn variable_type_must_match_argument_type() {
    let errs = errors(
        "query Q($x: String!) { arguments { intArgField(intArg: $x) } }",
    );
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::VariableTypeMismatch { .. })));
}

#[test]
fn string_literal_is_not_coercible_to_int() {
    let errs = errors(r#"{ arguments { intArgField(intArg: "123") } }"#);
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::IncorrectValueType(_))));
}

#[test]
fn int_literal_is_coercible_to_float() {
    let errs = errors("{ arguments { floatArgField(floatArg: 123) } }");
    assert!(errs.is_empty());
}

#[test]
fn bare_value_coerces_into_a_list_position() {
    let errs = errors("{ arguments { booleanListArgField(booleanListArg: true) } }");
    assert!(errs.is_empty());
}

#[test]
fn null_literal_is_valid_for_a_nullable_complex_input() {
    let errs = errors("{ findDog(complex: null) { name } }");
    assert!(errs.is_empty());
}

#[test]
fn variable_nested_inside_an_input_object_literal_resolves_against_the_operation() {
    let errs = errors(
        r#"query Q($who: String!) { arguments { complexArgField(complexArg: { name: $who }) } }"#,
    );
    assert!(errs.is_empty());
}

#[test]
fn undefined_input_object_field_is_rejected() {
    let errs = errors(
        r#"{ arguments { complexArgField(complexArg: { name: "Fido", nickname: "Fi" }) } }"#,
    );
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::UndefinedInputObjectField { field, .. } if field == "nickname"
    )));
}

#[test]
fn undefined_directive_is_rejected() {
    let errs = errors("{ dog { name @notreal } }");
    assert!(errs.iter().any(|e| matches!(
        e,
        GqlError::UndefinedDirective(name) if name == "notreal"
    )));
}

#[test]
fn directive_used_at_an_illegal_location_is_rejected() {
    let errs = errors("query @skip(if: true) { dog { name } }");
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::InvalidDirectiveLocation { .. })));
}

#[test]
fn non_repeatable_directive_used_twice_is_rejected() {
    let errs = errors("{ dog { name @skip(if: true) @skip(if: false) } }");
    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::RepeatedDirective(name) if name == "skip")));
}

#[test]
fn variable_argument_to_a_field_directive_is_type_checked_not_rejected_as_a_constant() {
    let errs = errors("query Q($show: Boolean!) { dog { name @include(if: $show) } }");
    assert!(errs.is_empty());
}

#[test]
fn variable_argument_to_a_field_directive_inside_a_spread_fragment_is_type_checked() {
    let errs = errors(
        "query Q($show: Boolean!) { dog { ...f } } fragment f on Dog { name @include(if: $show) }",
    );
    assert!(errs.is_empty());
}

#[test]
fn repeatable_directive_may_be_used_twice() {
    let errs = errors(
        r#"{ dog { name @custom(names: ["a"]) @custom(names: ["b"]) } }"#,
    );
    assert!(errs.is_empty());
}

#[test]
fn selection_resolves_through_an_object_then_a_list_of_an_interface() {
    let errs = errors("{ dog { owner { pets { name } } } }");
    assert!(errs.is_empty());
}

#[test]
fn field_whose_return_type_is_absent_from_the_schema_is_reported() {
    let schema = parse_schema::<String>(
        "type Query { ghost: Phantom }",
    )
    .expect("fixture schema parses")
    .into_static();
    let q = query("{ ghost }");

    let errs = match validate(&q, &schema) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.into_vec(),
    };

    assert!(errs
        .iter()
        .any(|e| matches!(e, GqlError::MissingTypeDefinition(name) if name == "Phantom")));
}
