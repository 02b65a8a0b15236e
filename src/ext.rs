//! Small accessor traits over `graphql_parser`'s AST.
//!
//! Rather than reopening the upstream enums with mix-in traits, each trait
//! here adds one narrow, exhaustively-matched projection (a name, a
//! selection set, a type) that the validator needs from several call
//! sites. These carry no `Span` — this crate's errors never point at
//! source locations (see `error`).
//!
//! `OperationDefinition` and `TypeDefinition` are each genuine four/six-way
//! sum types worth projecting this way; `Definition` and `Selection` are
//! matched directly at their few call sites instead, since a full
//! extension trait for a two- or three-variant enum would just rename
//! `match`.

use graphql_parser::query::{
    FragmentDefinition, OperationDefinition, SelectionSet, Text, TypeCondition,
};
use graphql_parser::schema::{
    self, Directive, DirectiveLocation, EnumType, InputObjectType, InterfaceType, ObjectType,
    ScalarType, Type, TypeDefinition, UnionType,
};

/// The three operation kinds an `OperationDefinition` can have, independent
/// of whether it was written as a bare anonymous selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Query,
    Mutation,
    Subscription,
}

impl OpKind {
    pub fn root_directive_location(self) -> DirectiveLocation {
        match self {
            OpKind::Query => DirectiveLocation::Query,
            OpKind::Mutation => DirectiveLocation::Mutation,
            OpKind::Subscription => DirectiveLocation::Subscription,
        }
    }
}

pub trait OperationDefinitionExt<'a, T>
where
    T: Text<'a>,
{
    fn op_kind(&self) -> OpKind;
    fn op_name(&self) -> Option<&T::Value>;
    fn op_variable_definitions(&self) -> &[graphql_parser::query::VariableDefinition<'a, T>];
    fn op_directives(&self) -> &[Directive<'a, T>];
    fn op_selection_set(&self) -> &SelectionSet<'a, T>;
}

impl<'a, T> OperationDefinitionExt<'a, T> for OperationDefinition<'a, T>
where
    T: Text<'a>,
{
    fn op_kind(&self) -> OpKind {
        match self {
            OperationDefinition::SelectionSet(_) | OperationDefinition::Query(_) => OpKind::Query,
            OperationDefinition::Mutation(_) => OpKind::Mutation,
            OperationDefinition::Subscription(_) => OpKind::Subscription,
        }
    }

    fn op_name(&self) -> Option<&T::Value> {
        match self {
            OperationDefinition::SelectionSet(_) => None,
            OperationDefinition::Query(q) => q.name.as_ref(),
            OperationDefinition::Mutation(m) => m.name.as_ref(),
            OperationDefinition::Subscription(s) => s.name.as_ref(),
        }
    }

    fn op_variable_definitions(&self) -> &[graphql_parser::query::VariableDefinition<'a, T>] {
        match self {
            OperationDefinition::SelectionSet(_) => &[],
            OperationDefinition::Query(q) => &q.variable_definitions,
            OperationDefinition::Mutation(m) => &m.variable_definitions,
            OperationDefinition::Subscription(s) => &s.variable_definitions,
        }
    }

    fn op_directives(&self) -> &[Directive<'a, T>] {
        match self {
            OperationDefinition::SelectionSet(_) => &[],
            OperationDefinition::Query(q) => &q.directives,
            OperationDefinition::Mutation(m) => &m.directives,
            OperationDefinition::Subscription(s) => &s.directives,
        }
    }

    fn op_selection_set(&self) -> &SelectionSet<'a, T> {
        match self {
            OperationDefinition::SelectionSet(set) => set,
            OperationDefinition::Query(q) => &q.selection_set,
            OperationDefinition::Mutation(m) => &m.selection_set,
            OperationDefinition::Subscription(s) => &s.selection_set,
        }
    }
}

pub trait FragmentDefinitionExt<'a, T>
where
    T: Text<'a>,
{
    fn on_type(&self) -> &T::Value;
}

impl<'a, T> FragmentDefinitionExt<'a, T> for FragmentDefinition<'a, T>
where
    T: Text<'a>,
{
    fn on_type(&self) -> &T::Value {
        let TypeCondition::On(ty) = &self.type_condition;
        ty
    }
}

/// The kind of a schema `TypeDefinition`, used for the leaf/composite and
/// input/output predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

pub trait TypeDefinitionExt<'a, T>
where
    T: Text<'a>,
{
    fn def_name(&self) -> &T::Value;
    fn kind(&self) -> TypeKind;
    fn is_composite(&self) -> bool;
    fn is_leaf(&self) -> bool;
    fn fields(&self) -> &[schema::Field<'a, T>];
    fn field(&self, name: &str) -> Option<&schema::Field<'a, T>>;
    fn implements(&self) -> &[T::Value];
    fn as_object(&self) -> Option<&ObjectType<'a, T>>;
    fn as_interface(&self) -> Option<&InterfaceType<'a, T>>;
    fn as_union(&self) -> Option<&UnionType<'a, T>>;
    fn as_enum(&self) -> Option<&EnumType<'a, T>>;
    fn as_input_object(&self) -> Option<&InputObjectType<'a, T>>;
    fn as_scalar(&self) -> Option<&ScalarType<'a, T>>;
}

impl<'a, T> TypeDefinitionExt<'a, T> for TypeDefinition<'a, T>
where
    T: Text<'a>,
{
    fn def_name(&self) -> &T::Value {
        match self {
            TypeDefinition::Scalar(ty) => &ty.name,
            TypeDefinition::Object(ty) => &ty.name,
            TypeDefinition::Interface(ty) => &ty.name,
            TypeDefinition::Union(ty) => &ty.name,
            TypeDefinition::Enum(ty) => &ty.name,
            TypeDefinition::InputObject(ty) => &ty.name,
        }
    }

    fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Scalar(_) => TypeKind::Scalar,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::Union(_) => TypeKind::Union,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
        }
    }

    fn is_composite(&self) -> bool {
        matches!(
            self.kind(),
            TypeKind::Object | TypeKind::Interface | TypeKind::Union
        )
    }

    fn is_leaf(&self) -> bool {
        matches!(self.kind(), TypeKind::Scalar | TypeKind::Enum)
    }

    fn fields(&self) -> &[schema::Field<'a, T>] {
        match self {
            TypeDefinition::Object(ty) => &ty.fields,
            TypeDefinition::Interface(ty) => &ty.fields,
            TypeDefinition::Scalar(_)
            | TypeDefinition::Union(_)
            | TypeDefinition::Enum(_)
            | TypeDefinition::InputObject(_) => &[],
        }
    }

    fn field(&self, name: &str) -> Option<&schema::Field<'a, T>> {
        self.fields().iter().find(|f| f.name.as_ref() == name)
    }

    fn implements(&self) -> &[T::Value] {
        match self {
            TypeDefinition::Object(ty) => &ty.implements_interfaces,
            TypeDefinition::Interface(ty) => &ty.implements_interfaces,
            _ => &[],
        }
    }

    fn as_object(&self) -> Option<&ObjectType<'a, T>> {
        match self {
            TypeDefinition::Object(ty) => Some(ty),
            _ => None,
        }
    }

    fn as_interface(&self) -> Option<&InterfaceType<'a, T>> {
        match self {
            TypeDefinition::Interface(ty) => Some(ty),
            _ => None,
        }
    }

    fn as_union(&self) -> Option<&UnionType<'a, T>> {
        match self {
            TypeDefinition::Union(ty) => Some(ty),
            _ => None,
        }
    }

    fn as_enum(&self) -> Option<&EnumType<'a, T>> {
        match self {
            TypeDefinition::Enum(ty) => Some(ty),
            _ => None,
        }
    }

    fn as_input_object(&self) -> Option<&InputObjectType<'a, T>> {
        match self {
            TypeDefinition::InputObject(ty) => Some(ty),
            _ => None,
        }
    }

    fn as_scalar(&self) -> Option<&ScalarType<'a, T>> {
        match self {
            TypeDefinition::Scalar(ty) => Some(ty),
            _ => None,
        }
    }
}

pub trait TypeExt<'a, T>
where
    T: Text<'a>,
{
    /// The innermost named type, stripping any number of `NonNull`/`List`
    /// wrappers.
    fn named(&self) -> &T::Value;

    fn is_non_null(&self) -> bool;
}

impl<'a, T> TypeExt<'a, T> for Type<'a, T>
where
    T: Text<'a>,
{
    fn named(&self) -> &T::Value {
        match self {
            Type::NamedType(name) => name,
            Type::ListType(inner) | Type::NonNullType(inner) => inner.named(),
        }
    }

    fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullType(_))
    }
}

pub const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Renders a schema `Type` the way it would be written in SDL, for use in
/// diagnostic messages (`String!`, `[String]`, `[String!]!`, ...).
pub fn type_to_string<'a, T>(ty: &Type<'a, T>) -> String
where
    T: Text<'a>,
{
    match ty {
        Type::NamedType(name) => name.as_ref().to_string(),
        Type::ListType(inner) => format!("[{}]", type_to_string(inner)),
        Type::NonNullType(inner) => format!("{}!", type_to_string(inner)),
    }
}
