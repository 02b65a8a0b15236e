//! The flat, span-free error model.
//!
//! This validator has no source locations to offer — a caller that wants
//! that experience wraps these errors with its own position tracking — so
//! `GqlError` is a plain, owned, `thiserror`-derived enum, and accumulation
//! uses `NonEmpty` instead of bailing on the first failure.

use std::fmt;

/// A non-empty `Vec`. Validation never reports "zero errors" as a failure,
/// so the accumulator type makes that state unrepresentable rather than
/// leaving it to a runtime check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmpty<T> {
    head: T,
    tail: Vec<T>,
}

impl<T> NonEmpty<T> {
    pub fn new(head: T) -> Self {
        NonEmpty {
            head,
            tail: Vec::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.tail.push(item);
    }

    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }

    pub fn into_vec(self) -> Vec<T> {
        let mut v = Vec::with_capacity(self.len());
        v.push(self.head);
        v.extend(self.tail);
        v
    }

    /// Builds a `NonEmpty` from a plain `Vec`, returning `None` if it was
    /// empty.
    pub fn from_vec(mut v: Vec<T>) -> Option<Self> {
        if v.is_empty() {
            return None;
        }
        let tail = v.split_off(1);
        Some(NonEmpty { head: v.remove(0), tail })
    }

    /// Merges another accumulator's errors into this one, in order.
    pub fn extend(&mut self, other: NonEmpty<T>) {
        self.tail.push(other.head);
        self.tail.extend(other.tail);
    }
}

impl<T> IntoIterator for NonEmpty<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// Collects a stream of `Result<(), GqlError>`-shaped checks into a single
/// accumulator, running every check rather than stopping at the first
/// failure.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<GqlError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        ErrorSink { errors: Vec::new() }
    }

    pub fn push(&mut self, error: GqlError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: ErrorSink) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), NonEmpty<GqlError>> {
        match NonEmpty::from_vec(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }
}

/// A single name as it appears in source text, owned so that errors can
/// outlive the borrowed AST they were produced from.
pub type Name = String;

/// Every way an executable document can fail static validation against a
/// schema, per the October 2021 GraphQL specification's validation
/// sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GqlError {
    #[error("the schema document defines more than one schema block")]
    MultipleSchemaDefinitions,

    #[error("the type system document does not define a `{0}` type")]
    UndefinedType(Name),

    #[error("operation `{0}` is defined more than once")]
    DuplicateOperationName(Name),

    #[error("anonymous operations are not allowed when the document defines more than one operation")]
    MixedAnonymousOperation,

    #[error("subscription `{operation}` must select exactly one field, found {found}")]
    MultipleSubscriptionRoots { operation: Name, found: usize },

    #[error("the schema has no root type for `{0}` operations")]
    UndefinedRootType(OpKindName),

    #[error("field `{field}` is not defined on type `{ty}`")]
    UndefinedField { ty: Name, field: Name },

    #[error("the type system document does not define return type `{0}`")]
    MissingTypeDefinition(Name),

    #[error("field `{field}` returns `{ty}`, a leaf type, and must not have a selection set")]
    UnexpectedSubselection { ty: Name, field: Name },

    #[error("field `{field}` returns `{ty}`, a composite type, and must have a selection set")]
    MissingSubselection { ty: Name, field: Name },

    #[error("field `{field}` does not take an argument named `{argument}`")]
    UndefinedArgument { field: Name, argument: Name },

    #[error("directive `{directive}` does not take an argument named `{argument}`")]
    UndefinedDirectiveArgument { directive: Name, argument: Name },

    #[error("argument `{0}` is provided more than once")]
    DuplicateArgumentName(Name),

    #[error("field `{field}` is missing required argument `{argument}`")]
    MissingRequiredArgument { field: Name, argument: Name },

    #[error("directive `{directive}` is missing required argument `{argument}`")]
    MissingRequiredDirectiveArgument { directive: Name, argument: Name },

    #[error("fragment `{0}` is defined more than once")]
    DuplicateFragmentName(Name),

    #[error("fragment `{fragment}` is never used")]
    UnusedFragment { fragment: Name },

    #[error("fragment spread refers to undefined fragment `{0}`")]
    UndefinedFragment(Name),

    #[error("fragment `{fragment}` is conditioned on undefined type `{ty}`")]
    UndefinedFragmentTarget { fragment: Name, ty: Name },

    #[error("inline fragment is conditioned on undefined type `{0}`")]
    UndefinedInlineFragmentTarget(Name),

    #[error("fragment `{fragment}` is conditioned on non-composite type `{ty}`")]
    NonCompositeFragmentTarget { fragment: Name, ty: Name },

    #[error("inline fragment is conditioned on non-composite type `{0}`")]
    NonCompositeInlineFragmentTarget(Name),

    #[error("fragment spreads form a cycle through: {}", .0.join(" -> "))]
    CyclicFragmentSpread(Vec<Name>),

    #[error("fragment `{fragment}` cannot be spread inside type `{parent}`, the types are disjoint")]
    ImpossibleFragmentSpread { fragment: Name, parent: Name },

    #[error("inline fragment on `{condition}` cannot be spread inside type `{parent}`, the types are disjoint")]
    ImpossibleInlineFragment { condition: Name, parent: Name },

    #[error("directive `{0}` is not defined")]
    UndefinedDirective(Name),

    #[error("directive `{directive}` is not valid at this location")]
    InvalidDirectiveLocation { directive: Name },

    #[error("non-repeatable directive `{0}` is used more than once on the same location")]
    RepeatedDirective(Name),

    #[error("value is not a valid `{0}`")]
    IncorrectValueType(Name),

    #[error("input object provides a value for field `{field}`, which is not defined on `{ty}`")]
    UndefinedInputObjectField { ty: Name, field: Name },

    #[error("input object `{ty}` is missing required field `{field}`")]
    MissingRequiredInputObjectField { ty: Name, field: Name },

    #[error("variable `${0}` is declared more than once")]
    DuplicateVariableName(Name),

    #[error("variable `${variable}` has type `{ty}`, which is not an input type")]
    NonInputVariable { variable: Name, ty: Name },

    #[error("variable `${0}` is not defined by the operation")]
    UndefinedVariable(Name),

    #[error("variable `${variable}` is never used by operation `{operation}`")]
    UnusedVariable { operation: Name, variable: Name },

    #[error("variable `${variable}` of type `{variable_ty}` cannot be used where `{location_ty}` is expected")]
    VariableTypeMismatch {
        variable: Name,
        variable_ty: Name,
        location_ty: Name,
    },

    #[error("variables are not allowed in a default value")]
    VariableInDefaultValue,
}

/// Used only inside `GqlError::UndefinedRootType`'s message; not part of
/// the public AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKindName {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OpKindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKindName::Query => write!(f, "query"),
            OpKindName::Mutation => write!(f, "mutation"),
            OpKindName::Subscription => write!(f, "subscription"),
        }
    }
}
