//! Input schema model for the binding generator.
//!
//! This module defines the object model the generator consumes: API classes
//! with a field tree and messages, shared enumerations embedded in the type
//! grammar, and error definitions. The model is assumed already validated
//! (every `Record`/`Ref` class name exists in the class list); it can be
//! built in memory or deserialized from JSON by the CLI.

use serde::Deserialize;

/// A complete API schema: the class list plus the error definitions shared
/// by all classes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSchema {
    pub classes: Vec<ApiClass>,
    #[serde(default)]
    pub errors: Vec<ErrorDef>,
}

impl ApiSchema {
    /// Parse a schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up an error definition by name.
    pub fn error_def(&self, name: &str) -> Option<&ErrorDef> {
        self.errors.iter().find(|e| e.name == name)
    }
}

/// One remote object class: an ordered field tree (possibly empty) and an
/// ordered list of remote-callable messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiClass {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ApiClass {
    /// Field-less classes get no reference field and no `Record` type.
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// A node in a class's field tree. A leaf is one wire field; a namespace
/// groups children under a shared path prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldNode {
    Namespace {
        name: String,
        children: Vec<FieldNode>,
    },
    Leaf(Field),
}

/// A leaf field. The wire key is the join of ancestor namespace names and
/// this name; case-transformed, the same path becomes the generated field
/// identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deprecated: bool,
}

/// A remote-callable message on a class.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub params: Vec<Param>,
    pub result: Option<MessageResult>,
    /// Whether the call carries the session reference as its first wire
    /// argument.
    #[serde(default = "default_true")]
    pub session_required: bool,
    /// Whether an `Async.<class>.<message>` counterpart exists.
    #[serde(default)]
    pub has_async: bool,
    /// Names of schema-level error definitions this message can raise.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Release this message first appeared in.
    pub published_since: Option<String>,
    /// Release this message was deprecated in, if any.
    pub deprecated_since: Option<String>,
    /// Minimum role allowed to make the call.
    pub min_role: Option<String>,
    /// Static messages have no implicit receiver; instance messages thread
    /// the calling object's reference as the first wire argument.
    #[serde(default)]
    pub is_static: bool,
}

fn default_true() -> bool {
    true
}

/// Declared result of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResult {
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub description: String,
}

/// One message parameter. Trailing parameters marked optional are
/// individually droppable, producing one overload per suffix length.
#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub optional: bool,
}

/// The abstract type grammar. Structural equality is the identity used for
/// deduplication in the encountered-type registry, so `Eq`/`Hash` are
/// derived over the full shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    String,
    SecretString,
    Int,
    Float,
    Bool,
    DateTime,
    Enum {
        name: String,
        values: Vec<EnumMember>,
    },
    Set(Box<Type>),
    Map(Box<Type>, Box<Type>),
    /// Reference to a remote object, held as an opaque identifier string.
    Ref(String),
    /// Snapshot of all fields of a remote object class.
    Record(String),
    /// Optional wrapper. Erased during generation: resolves, defaults, and
    /// decodes identically to the wrapped type.
    Option(Box<Type>),
}

impl Type {
    /// The type with any `Option` wrappers stripped.
    pub fn unwrap_option(&self) -> &Type {
        match self {
            Type::Option(inner) => inner.unwrap_option(),
            other => other,
        }
    }

    /// Whether the (option-stripped) type is a record snapshot.
    pub fn is_record(&self) -> bool {
        matches!(self.unwrap_option(), Type::Record(_))
    }
}

/// One enumeration member: the wire value and its documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct EnumMember {
    pub value: String,
    #[serde(default)]
    pub description: String,
}

/// A declared API error: the generated exception type's fields are filled
/// positionally from the wire argument list at throw time.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub description: String,
}
