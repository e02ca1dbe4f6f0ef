//! Type resolution: the abstract type grammar mapped to Java type names,
//! marshal-function names, and default-value literals.
//!
//! The three resolution functions are pure over the type's structure; the
//! engine entry points additionally register every visited type (and any
//! embedded enum definition) into the generation context, which is what
//! drives phase 2. `Option` is erased throughout: it resolves, defaults,
//! and registers as its wrapped type, so "absent" and "present with the
//! zero value" are indistinguishable on the wire.

use crate::r#gen::context::GenerationContext;
use crate::r#gen::error::GenError;
use crate::r#gen::ident::class_case;
use crate::schema::Type;

/// The reserved identifier representing a null object reference.
pub const NULL_REF: &str = "OpaqueRef:NULL";

/// Enum defaults that deviate from the `UNRECOGNIZED` sentinel. The lock
/// mode enum defaults to its network-default member.
const ENUM_DEFAULT_OVERRIDES: &[(&str, &str)] = &[("vif_locking_mode", "NETWORK_DEFAULT")];

/// Register a type (and everything reachable inside it) into the context.
/// `Option` wrappers register their inner type instead, so phase 2 never
/// sees two shapes that would produce identically named decode functions.
fn register(ctx: &mut GenerationContext, ty: &Type) {
    match ty {
        Type::Option(inner) => register(ctx, inner),
        _ => {
            if let Type::Enum { name, values } = ty {
                ctx.register_enum(name, values);
            }
            ctx.note_type(ty);
            match ty {
                Type::Set(of) => register(ctx, of),
                Type::Map(key, value) => {
                    register(ctx, key);
                    register(ctx, value);
                }
                _ => {}
            }
        }
    }
}

/// Engine entry: Java type name, registering the visited type.
pub fn target_type_name(ctx: &mut GenerationContext, ty: &Type) -> String {
    register(ctx, ty);
    java_type(ty)
}

/// Engine entry: full marshal function name (`toXxx`), registering the
/// visited type.
pub fn marshal_fn_name(ctx: &mut GenerationContext, ty: &Type) -> String {
    register(ctx, ty);
    format!("to{}", marshal_suffix(ty))
}

/// Engine entry: default-value literal, registering the visited type.
/// Defaulting a record is a generator bug and fails the run.
pub fn default_value_literal(ctx: &mut GenerationContext, ty: &Type) -> Result<String, GenError> {
    register(ctx, ty);
    default_literal(ty)
}

/// Pure mapping from type shape to Java type name.
pub fn java_type(ty: &Type) -> String {
    match ty {
        Type::String | Type::SecretString => "String".into(),
        Type::Int => "Long".into(),
        Type::Float => "Double".into(),
        Type::Bool => "Boolean".into(),
        Type::DateTime => "Date".into(),
        Type::Enum { name, .. } => format!("Types.{}", class_case(name)),
        Type::Set(of) => format!("Set<{}>", java_type(of)),
        Type::Map(key, value) => format!("Map<{}, {}>", java_type(key), java_type(value)),
        Type::Ref(cls) => class_case(cls),
        Type::Record(cls) => format!("{}.Record", class_case(cls)),
        Type::Option(inner) => java_type(inner),
    }
}

/// Pure mapping from type shape to marshal-function suffix.
pub fn marshal_suffix(ty: &Type) -> String {
    match ty {
        Type::String | Type::SecretString => "String".into(),
        Type::Int => "Long".into(),
        Type::Float => "Double".into(),
        Type::Bool => "Boolean".into(),
        Type::DateTime => "Date".into(),
        Type::Enum { name, .. } => class_case(name),
        Type::Set(of) => format!("SetOf{}", marshal_suffix(of)),
        Type::Map(key, value) => {
            format!("MapOf{}{}", marshal_suffix(key), marshal_suffix(value))
        }
        Type::Ref(cls) => class_case(cls),
        Type::Record(cls) => format!("{}Record", class_case(cls)),
        Type::Option(inner) => marshal_suffix(inner),
    }
}

/// Pure mapping from type shape to default-value literal.
pub fn default_literal(ty: &Type) -> Result<String, GenError> {
    match ty {
        Type::String | Type::SecretString => Ok("\"\"".into()),
        Type::Int => Ok("0".into()),
        Type::Float => Ok("0.0".into()),
        Type::Bool => Ok("false".into()),
        Type::DateTime => Ok("new Date(0)".into()),
        Type::Enum { name, .. } => {
            let member = ENUM_DEFAULT_OVERRIDES
                .iter()
                .find(|(n, _)| n == name)
                .map_or("UNRECOGNIZED", |(_, m)| *m);
            Ok(format!("Types.{}.{}", class_case(name), member))
        }
        Type::Set(of) => Ok(format!("new LinkedHashSet<{}>()", java_type(of))),
        Type::Map(key, value) => Ok(format!(
            "new HashMap<{}, {}>()",
            java_type(key),
            java_type(value)
        )),
        Type::Ref(cls) => Ok(format!("new {}(\"{}\")", class_case(cls), NULL_REF)),
        Type::Record(cls) => Err(GenError::RecordDefault(cls.clone())),
        Type::Option(inner) => default_literal(inner),
    }
}
