//! The two validation phases, run in sequence.

pub mod directives;
pub mod fragments;
pub mod operations;
pub mod values;
pub mod walk;

use graphql_parser::query::{Document as QueryDocument, Text};
use graphql_parser::schema::Document as SchemaDocument;

use crate::document_context::DocumentContext;
use crate::error::{ErrorSink, GqlError};
use crate::schema_context::SchemaContext;

/// Runs both phases against an already-built pair of contexts, appending
/// every failure into `sink`. Phase 2 only runs if Phase 1 produced no
/// errors — a document with a broken fragment gives one clean report
/// instead of a cascade through every operation that spreads it.
pub fn run<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    doc: &DocumentContext<'_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    if schema.has_multiple_schema_definitions() {
        sink.push(GqlError::MultipleSchemaDefinitions);
    }

    let mut phase_one = ErrorSink::new();
    fragments::check_fragments(schema, doc, &mut phase_one);

    let phase_one_ok = phase_one.is_empty();
    sink.extend(phase_one);

    if phase_one_ok {
        operations::check_operations(schema, doc, sink);
    }
}

/// Convenience wrapper building fresh contexts over a query/schema pair;
/// exercised directly by integration tests, and by [`crate::validate`].
pub fn validate_documents<'a, T>(
    query: &QueryDocument<'a, T>,
    schema: &SchemaDocument<'a, T>,
) -> ErrorSink
where
    T: Text<'a>,
{
    let schema_ctx = SchemaContext::new(schema);
    let doc_ctx = DocumentContext::new(query);

    let mut sink = ErrorSink::new();
    run(&schema_ctx, &doc_ctx, &mut sink);
    sink
}
