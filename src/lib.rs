//! Static validation of a GraphQL executable document against a type
//! system document, per the October 2021 GraphQL specification's
//! validation sections.
//!
//! The entry point is [`validate`]: given a parsed query/mutation/
//! subscription document and a parsed schema document, it returns the
//! query document back unchanged if it's valid, or every validation
//! failure found, accumulated rather than reported one at a time.
//!
//! ```
//! use graphql_parser::{parse_query, parse_schema};
//!
//! let schema = parse_schema::<String>(
//!     "type Query { name: String! }"
//! ).unwrap();
//!
//! let query = parse_query::<String>("{ name }").unwrap();
//!
//! assert!(gql_validate::validate(&query, &schema).is_ok());
//! ```

pub mod document_context;
pub mod error;
pub mod ext;
pub mod schema_context;
pub mod topo;
pub mod validate;

use graphql_parser::query::{Document as QueryDocument, Text};
use graphql_parser::schema::Document as SchemaDocument;

pub use document_context::DocumentContext;
pub use error::{GqlError, NonEmpty};
pub use schema_context::SchemaContext;

/// Validates `query` against `schema`, returning `query` unchanged on
/// success. On failure, returns every diagnostic found — validation never
/// stops at the first error.
pub fn validate<'a, 'q, T>(
    query: &'q QueryDocument<'a, T>,
    schema: &SchemaDocument<'a, T>,
) -> Result<&'q QueryDocument<'a, T>, NonEmpty<GqlError>>
where
    T: Text<'a>,
{
    let sink = validate::validate_documents(query, schema);
    match sink.into_result() {
        Ok(()) => Ok(query),
        Err(errors) => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use graphql_parser::{parse_query, parse_schema};

    use super::*;

    const DOG_SCHEMA: &str = include_str!("../tests/fixtures/dog_schema.graphql");

    fn schema() -> SchemaDocument<'static, String> {
        parse_schema::<String>(DOG_SCHEMA).unwrap().into_static()
    }

    #[test]
    fn accepts_a_trivially_valid_query() {
        let query = parse_query::<String>("{ dog { name } }")
            .unwrap()
            .into_static();
        assert!(validate(&query, &schema()).is_ok());
    }

    #[test]
    fn rejects_an_undefined_field() {
        let query = parse_query::<String>("{ dog { nickname } }")
            .unwrap()
            .into_static();
        let errors = validate(&query, &schema()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, GqlError::UndefinedField { field, .. } if field == "nickname")));
    }

    #[test]
    fn rejects_a_leaf_field_with_a_subselection() {
        let query = parse_query::<String>("{ dog { name { x } } }")
            .unwrap()
            .into_static();
        let errors = validate(&query, &schema()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, GqlError::UnexpectedSubselection { .. })));
    }

    #[test]
    fn accumulates_more_than_one_error_at_once() {
        let query = parse_query::<String>("{ dog { nonexistent } catOrDog { typo } }")
            .unwrap()
            .into_static();
        let errors = validate(&query, &schema()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
