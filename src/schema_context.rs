//! A read-only index over a type-system document.
//!
//! Built once per `validate` call and threaded through every pass by
//! reference, rather than reached for through thread-local state. This
//! index also synthesizes the five built-in scalars as first-class types,
//! so callers never need to special-case them separately from explicitly
//! declared ones.

use std::collections::HashSet;

use graphql_parser::schema::{
    self, Definition as SchemaDefinition, Document as SchemaDocument, Text, Type,
};
use indexmap::IndexMap;

use crate::ext::{is_builtin_scalar, TypeDefinitionExt, TypeExt, TypeKind};

/// A resolved named type: either a type defined in the document, or one of
/// the five scalars every schema has whether or not it says so.
#[derive(Debug, Clone, Copy)]
pub enum TypeEntry<'v, 'a, T>
where
    T: Text<'a>,
{
    Defined(&'v schema::TypeDefinition<'a, T>),
    Builtin(&'static str),
}

impl<'v, 'a, T> TypeEntry<'v, 'a, T>
where
    T: Text<'a>,
{
    pub fn name(&self) -> &str {
        match self {
            TypeEntry::Defined(ty) => ty.def_name().as_ref(),
            TypeEntry::Builtin(name) => name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeEntry::Defined(ty) => ty.kind(),
            TypeEntry::Builtin(_) => TypeKind::Scalar,
        }
    }

    pub fn is_composite(&self) -> bool {
        match self {
            TypeEntry::Defined(ty) => ty.is_composite(),
            TypeEntry::Builtin(_) => false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        match self {
            TypeEntry::Defined(ty) => ty.is_leaf(),
            TypeEntry::Builtin(_) => true,
        }
    }

    pub fn as_defined(&self) -> Option<&'v schema::TypeDefinition<'a, T>> {
        match self {
            TypeEntry::Defined(ty) => Some(ty),
            TypeEntry::Builtin(_) => None,
        }
    }
}

/// Root operation type names, resolved from the (at most one) `schema`
/// block, falling back to the conventional `Query` / `Mutation` /
/// `Subscription` type names when no `schema` block is present, per the
/// GraphQL spec's "default root operation type names" rule.
#[derive(Debug, Clone)]
struct RootTypes {
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

pub struct SchemaContext<'v, 'a, T>
where
    T: Text<'a>,
{
    types: IndexMap<String, TypeEntry<'v, 'a, T>>,
    directives: IndexMap<String, &'v schema::DirectiveDefinition<'a, T>>,
    roots: RootTypes,
    multiple_schema_definitions: bool,
}

impl<'v, 'a, T> SchemaContext<'v, 'a, T>
where
    T: Text<'a>,
{
    pub fn new(document: &'v SchemaDocument<'a, T>) -> Self {
        let mut types: IndexMap<String, TypeEntry<'v, 'a, T>> = IndexMap::new();

        // Built-ins come first so that an explicit schema definition of
        // `scalar Int` (unusual, but not forbidden) simply shadows it below
        // rather than racing it — first-definition-wins, and the builtins
        // are considered to be defined "before" anything in the document.
        for name in crate::ext::BUILTIN_SCALARS {
            types.insert((*name).to_string(), TypeEntry::Builtin(name));
        }

        let mut directives = IndexMap::new();
        let mut schema_blocks: Vec<&schema::SchemaDefinition<'a, T>> = Vec::new();

        for definition in &document.definitions {
            match definition {
                SchemaDefinition::TypeDefinition(ty) => {
                    let name = ty.def_name().as_ref().to_string();
                    types.entry(name).or_insert(TypeEntry::Defined(ty));
                }
                SchemaDefinition::DirectiveDefinition(directive) => {
                    directives
                        .entry(directive.name.as_ref().to_string())
                        .or_insert(directive);
                }
                SchemaDefinition::SchemaDefinition(schema_def) => {
                    schema_blocks.push(schema_def);
                }
                SchemaDefinition::TypeExtension(_) => {
                    // Type extensions are a schema-construction concern for
                    // the collaborator that builds the type-system document
                    // handed to this crate; by the time a document reaches
                    // `validate`, it is expected to already be fully merged.
                }
            }
        }

        let roots = if let Some(schema_def) = schema_blocks.first() {
            RootTypes {
                query: schema_def.query.as_ref().map(|t| t.as_ref().to_string()),
                mutation: schema_def.mutation.as_ref().map(|t| t.as_ref().to_string()),
                subscription: schema_def
                    .subscription
                    .as_ref()
                    .map(|t| t.as_ref().to_string()),
            }
        } else {
            RootTypes {
                query: types.get("Query").map(|_| "Query".to_string()),
                mutation: types.get("Mutation").map(|_| "Mutation".to_string()),
                subscription: types
                    .get("Subscription")
                    .map(|_| "Subscription".to_string()),
            }
        };

        SchemaContext {
            types,
            directives,
            roots,
            multiple_schema_definitions: schema_blocks.len() > 1,
        }
    }

    pub fn has_multiple_schema_definitions(&self) -> bool {
        self.multiple_schema_definitions
    }

    pub fn find_type(&self, name: &str) -> Option<TypeEntry<'v, 'a, T>> {
        self.types.get(name).copied()
    }

    pub fn find_type_def(&self, name: &str) -> Option<&'v schema::TypeDefinition<'a, T>> {
        self.find_type(name).and_then(|entry| entry.as_defined())
    }

    pub fn directive_def(&self, name: &str) -> Option<&'v schema::DirectiveDefinition<'a, T>> {
        self.directives.get(name).copied()
    }

    pub fn root_type_name(&self, kind: crate::ext::OpKind) -> Option<&str> {
        match kind {
            crate::ext::OpKind::Query => self.roots.query.as_deref(),
            crate::ext::OpKind::Mutation => self.roots.mutation.as_deref(),
            crate::ext::OpKind::Subscription => self.roots.subscription.as_deref(),
        }
    }

    pub fn is_leaf(&self, name: &str) -> bool {
        self.find_type(name).map(|t| t.is_leaf()).unwrap_or(false)
    }

    pub fn is_composite(&self, name: &str) -> bool {
        self.find_type(name)
            .map(|t| t.is_composite())
            .unwrap_or(false)
    }

    pub fn is_input_type(&self, ty: &Type<'a, T>) -> bool {
        let name = ty.named().as_ref();
        match self.find_type(name) {
            Some(entry) => matches!(
                entry.kind(),
                TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject
            ),
            None => false,
        }
    }

    /// Looks up a field by name on a named output type, searching the
    /// type's own fields first and, for interfaces and unions, falling
    /// through to member/implementing types is *not* performed here — field
    /// existence on an abstract type is judged on the abstract type's own
    /// declared fields (plus the two meta-fields below). Concrete member
    /// lookups happen separately when narrowing through a fragment's type
    /// condition.
    pub fn field_def(&self, type_name: &str, field_name: &str) -> Option<&'v schema::Field<'a, T>> {
        if field_name == "__typename" {
            return None;
        }
        self.find_type_def(type_name)
            .and_then(|ty| ty.field(field_name))
    }

    /// True if `__typename` or a real field is present; used to special-case
    /// the meta field in the selection-set walker, which never appears in a
    /// `TypeDefinition`'s own `fields()`.
    pub fn has_field_or_meta(&self, type_name: &str, field_name: &str) -> bool {
        field_name == "__typename" || self.field_def(type_name, field_name).is_some()
    }

    /// The set of concrete object-type names a named type can resolve to at
    /// runtime: itself for an object type, its members for a union, and the
    /// objects (and interfaces) implementing it for an interface. Used by
    /// the fragment-spread covariance check (`ImpossibleFragmentSpread`).
    pub fn possible_types(&self, name: &str) -> HashSet<&str> {
        let mut out = HashSet::new();
        match self.find_type(name) {
            Some(TypeEntry::Defined(def)) => match def {
                schema::TypeDefinition::Object(obj) => {
                    out.insert(obj.name.as_ref());
                }
                schema::TypeDefinition::Interface(_) => {
                    out.insert(name);
                    for (candidate_name, entry) in &self.types {
                        if let TypeEntry::Defined(candidate_def) = entry {
                            if candidate_name != name
                                && candidate_def.implements().iter().any(|i| i.as_ref() == name)
                            {
                                out.insert(candidate_name.as_str());
                            }
                        }
                    }
                }
                schema::TypeDefinition::Union(union_ty) => {
                    for member in &union_ty.types {
                        out.extend(self.possible_types(member.as_ref()));
                    }
                }
                _ => {
                    out.insert(name);
                }
            },
            Some(TypeEntry::Builtin(builtin)) => {
                out.insert(builtin);
            }
            None => {}
        }
        out
    }

    /// Whether `sub` is spreadable into a selection whose runtime type is
    /// `sup`: the two names' possible-type sets intersect.
    pub fn types_overlap(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let sub_possible = self.possible_types(sub);
        let sup_possible = self.possible_types(sup);
        sub_possible.intersection(&sup_possible).next().is_some()
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        is_builtin_scalar(name)
    }
}
