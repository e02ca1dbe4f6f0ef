//! Marshalling generation (phase 2).
//!
//! Runs once over the frozen registry snapshot and produces the structured
//! context for the shared support unit: one decode function per distinct
//! encountered type shape, one exception type per declared error, and the
//! enum definitions. Decode functions map a generic, dynamically-typed wire
//! value (string / number / boolean / date / `Object[]` / map) into the
//! statically typed target value.

use std::collections::HashSet;

use serde::Serialize;

use crate::r#gen::class::EVENT_CLASS;
use crate::r#gen::context::ContextSnapshot;
use crate::r#gen::error::GenError;
use crate::r#gen::ident::{camel_case, class_case, enum_wire_to_constant};
use crate::r#gen::resolve::{java_type, marshal_suffix};
use crate::schema::{ApiSchema, Type};

/// The structured context handed to the support-unit template: three
/// collections, each complete and ordered.
#[derive(Debug, Serialize)]
pub struct SupportContext {
    pub errors: Vec<ErrorEntry>,
    pub enums: Vec<EnumEntry>,
    pub decoders: Vec<DecoderEntry>,
}

/// One generated exception type. Fields are filled positionally from the
/// wire argument list supplied at throw time.
#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub class_name: String,
    pub description: String,
    pub fields: Vec<String>,
}

/// One generated enumeration. The template prepends the `UNRECOGNIZED`
/// sentinel member.
#[derive(Debug, Serialize)]
pub struct EnumEntry {
    pub class_name: String,
    pub members: Vec<EnumMemberEntry>,
}

#[derive(Debug, Serialize)]
pub struct EnumMemberEntry {
    pub constant: String,
    pub wire: String,
    pub description: String,
}

/// One generated decode function.
#[derive(Debug, Serialize)]
pub struct DecoderEntry {
    pub target_type: String,
    pub fn_name: String,
    pub body: String,
    /// The body casts the wire value to a generic map.
    pub suppress_unchecked: bool,
    /// Reference decoders get an additional task-result variant.
    pub is_ref: bool,
}

/// Build the complete support-unit context from the registry snapshot.
pub fn build_support_context(
    schema: &ApiSchema,
    snapshot: &ContextSnapshot,
) -> Result<SupportContext, GenError> {
    let errors = schema
        .errors
        .iter()
        .map(|def| ErrorEntry {
            class_name: class_case(&def.name),
            description: def.description.clone(),
            fields: def.fields.iter().map(|f| camel_case(f)).collect(),
        })
        .collect();

    let enums = snapshot
        .enums()
        .iter()
        .map(|(name, values)| EnumEntry {
            class_name: class_case(name),
            members: values
                .iter()
                .map(|m| EnumMemberEntry {
                    constant: enum_wire_to_constant(&m.value),
                    wire: m.value.clone(),
                    description: m.description.clone(),
                })
                .collect(),
        })
        .collect();

    let mut decoders = Vec::new();
    let mut emitted = HashSet::new();
    for ty in snapshot.encountered_types() {
        push_decoder(schema, snapshot, ty, &mut decoders, &mut emitted)?;
    }
    // The event dispatch calls every field-bearing class's record decoder,
    // so each must exist even if no message ever resolved its record type.
    if emitted.contains("toEventRecord") {
        for class in schema.classes.iter().filter(|c| c.has_fields()) {
            let record_ty = Type::Record(class.name.clone());
            push_decoder(schema, snapshot, &record_ty, &mut decoders, &mut emitted)?;
        }
    }

    Ok(SupportContext {
        errors,
        enums,
        decoders,
    })
}

fn push_decoder(
    schema: &ApiSchema,
    snapshot: &ContextSnapshot,
    ty: &Type,
    decoders: &mut Vec<DecoderEntry>,
    emitted: &mut HashSet<String>,
) -> Result<(), GenError> {
    let fn_name = format!("to{}", marshal_suffix(ty));
    // String and SecretString share one decode function; emit it once.
    if !emitted.insert(fn_name.clone()) {
        return Ok(());
    }
    let body = decode_body(schema, snapshot, ty)?;
    decoders.push(DecoderEntry {
        target_type: java_type(ty),
        fn_name,
        body,
        suppress_unchecked: matches!(ty, Type::Map(_, _) | Type::Record(_)),
        is_ref: matches!(ty, Type::Ref(_)),
    });
    Ok(())
}

/// The decode-function body for one type shape, indented for the method
/// body of the support unit.
fn decode_body(
    schema: &ApiSchema,
    snapshot: &ContextSnapshot,
    ty: &Type,
) -> Result<String, GenError> {
    match ty {
        Type::String | Type::SecretString => Ok("        return (String) object;\n".into()),
        Type::Int => Ok("        return ((Number) object).longValue();\n".into()),
        Type::Float => Ok("        return ((Number) object).doubleValue();\n".into()),
        Type::Bool => Ok("        return (Boolean) object;\n".into()),
        Type::DateTime => Ok("        try {\n            \
             return (Date) object;\n        \
             } catch (ClassCastException e) {\n            \
             // Fallback: seconds since the epoch carried as a decimal string.\n            \
             return new Date(Long.parseLong((String) object) * 1000L);\n        \
             }\n"
            .into()),
        Type::Enum { name, .. } => {
            let java = format!("Types.{}", class_case(name));
            Ok(format!(
                "        String normalized = ((String) object).replace('-', '_').toUpperCase();\n        \
                 try {{\n            \
                 return {java}.valueOf(normalized);\n        \
                 }} catch (IllegalArgumentException e) {{\n            \
                 // Unknown wire values degrade to the sentinel, never fail.\n            \
                 return {java}.UNRECOGNIZED;\n        \
                 }}\n"
            ))
        }
        Type::Set(of) => {
            let element = java_type(of);
            let decode = marshal_suffix(of);
            Ok(format!(
                "        Set<{element}> result = new LinkedHashSet<>();\n        \
                 for (Object item : (Object[]) object) {{\n            \
                 result.add(to{decode}(item));\n        \
                 }}\n        \
                 return result;\n"
            ))
        }
        Type::Map(key, value) => {
            let key_java = java_type(key);
            let value_java = java_type(value);
            let key_decode = marshal_suffix(key);
            let value_decode = marshal_suffix(value);
            Ok(format!(
                "        Map<Object, Object> raw = (Map<Object, Object>) object;\n        \
                 Map<{key_java}, {value_java}> result = new HashMap<>();\n        \
                 for (Map.Entry<Object, Object> entry : raw.entrySet()) {{\n            \
                 result.put(to{key_decode}(entry.getKey()), to{value_decode}(entry.getValue()));\n        \
                 }}\n        \
                 return result;\n"
            ))
        }
        Type::Ref(cls) => Ok(format!(
            "        return new {}((String) object);\n",
            class_case(cls)
        )),
        Type::Record(cls) => record_decode_body(schema, snapshot, cls),
        Type::Option(inner) => decode_body(schema, snapshot, inner),
    }
}

fn record_decode_body(
    schema: &ApiSchema,
    snapshot: &ContextSnapshot,
    cls: &str,
) -> Result<String, GenError> {
    let fields = snapshot
        .record_fields(cls)
        .ok_or_else(|| GenError::UnregisteredRecord(cls.to_string()))?;
    let java = class_case(cls);
    let mut body = format!(
        "        Map<String, Object> map = (Map<String, Object>) object;\n        \
         {java}.Record record = new {java}.Record();\n"
    );
    for field in fields {
        body.push_str(&format!(
            "        record.{} = to{}(map.get(\"{}\"));\n",
            camel_case(&field.path),
            marshal_suffix(&field.ty),
            field.path
        ));
    }
    if cls == EVENT_CLASS {
        body.push_str(&event_snapshot_dispatch(schema, snapshot)?);
    }
    body.push_str("        return record;\n");
    Ok(body)
}

/// The polymorphic snapshot dispatch: decode the companion object kind,
/// then select the concrete record decoder by kind. One case per
/// field-bearing class; a missing record layout is a generation-time
/// omission, not a runtime condition.
fn event_snapshot_dispatch(
    schema: &ApiSchema,
    snapshot: &ContextSnapshot,
) -> Result<String, GenError> {
    let mut body = String::from(
        "        record.clazz = toObjectKind(map.get(\"class\"));\n        \
         Object snapshot = map.get(\"snapshot\");\n        \
         if (snapshot != null) {\n            \
         switch (record.clazz) {\n",
    );
    for class in schema.classes.iter().filter(|c| c.has_fields()) {
        if snapshot.record_fields(&class.name).is_none() {
            return Err(GenError::MissingSnapshotCase(class.name.clone()));
        }
        body.push_str(&format!(
            "                case {}:\n                    \
             record.snapshot = to{}Record(snapshot);\n                    \
             break;\n",
            enum_wire_to_constant(&class.name),
            class_case(&class.name)
        ));
    }
    body.push_str(
        "                default:\n                    \
         // Unknown kinds keep the raw wire value.\n                    \
         record.snapshot = snapshot;\n                    \
         break;\n            \
         }\n        \
         }\n",
    );
    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::r#gen::context::{GenerationContext, RecordField};
    use crate::schema::{ApiClass, EnumMember, ErrorDef};

    fn empty_schema() -> ApiSchema {
        ApiSchema {
            classes: vec![],
            errors: vec![],
        }
    }

    fn snapshot_with(f: impl FnOnce(&mut GenerationContext)) -> ContextSnapshot {
        let mut ctx = GenerationContext::new();
        f(&mut ctx);
        ctx.into_snapshot()
    }

    #[test]
    fn test_enum_decode_is_total() {
        let snapshot = snapshot_with(|_| {});
        let body = decode_body(
            &empty_schema(),
            &snapshot,
            &Type::Enum {
                name: "power_state".into(),
                values: vec![],
            },
        )
        .unwrap();
        // Case-insensitive, separator-normalized match with a sentinel
        // fallback: the decode can never raise for an enum.
        assert!(body.contains(".replace('-', '_').toUpperCase()"));
        assert!(body.contains("return Types.PowerState.valueOf(normalized);"));
        assert!(body.contains("return Types.PowerState.UNRECOGNIZED;"));
    }

    #[test]
    fn test_collection_decode_recurses_per_element() {
        let snapshot = snapshot_with(|_| {});
        let set_body = decode_body(
            &empty_schema(),
            &snapshot,
            &Type::Set(Box::new(Type::Ref("VM".into()))),
        )
        .unwrap();
        assert!(set_body.contains("result.add(toVM(item));"));

        let map_body = decode_body(
            &empty_schema(),
            &snapshot,
            &Type::Map(Box::new(Type::String), Box::new(Type::Int)),
        )
        .unwrap();
        assert!(map_body.contains("result.put(toString(entry.getKey()), toLong(entry.getValue()));"));
    }

    #[test]
    fn test_record_decode_uses_registry_layout() {
        let snapshot = snapshot_with(|ctx| {
            ctx.register_record(
                "VM",
                vec![
                    RecordField {
                        path: "name_label".into(),
                        ty: Type::String,
                    },
                    RecordField {
                        path: "memory_static_max".into(),
                        ty: Type::Int,
                    },
                ],
            );
        });
        let body = decode_body(&empty_schema(), &snapshot, &Type::Record("VM".into())).unwrap();
        assert!(body.contains("VM.Record record = new VM.Record();"));
        assert!(body.contains("record.nameLabel = toString(map.get(\"name_label\"));"));
        assert!(body.contains("record.memoryStaticMax = toLong(map.get(\"memory_static_max\"));"));
    }

    #[test]
    fn test_unregistered_record_is_fatal() {
        let snapshot = snapshot_with(|_| {});
        let result = decode_body(&empty_schema(), &snapshot, &Type::Record("SR".into()));
        assert!(matches!(result, Err(GenError::UnregisteredRecord(cls)) if cls == "SR"));
    }

    #[test]
    fn test_event_dispatch_covers_field_bearing_classes() {
        let schema = ApiSchema {
            classes: vec![
                ApiClass {
                    name: "VM".into(),
                    description: String::new(),
                    fields: vec![crate::schema::FieldNode::Leaf(crate::schema::Field {
                        name: "name_label".into(),
                        ty: Type::String,
                        description: String::new(),
                        deprecated: false,
                    })],
                    messages: vec![],
                },
                ApiClass {
                    name: "session".into(),
                    description: String::new(),
                    fields: vec![],
                    messages: vec![],
                },
            ],
            errors: vec![],
        };
        let snapshot = snapshot_with(|ctx| {
            ctx.register_record(
                "VM",
                vec![RecordField {
                    path: "name_label".into(),
                    ty: Type::String,
                }],
            );
            ctx.register_record(
                "event",
                vec![RecordField {
                    path: "id".into(),
                    ty: Type::Int,
                }],
            );
        });
        let body = decode_body(&schema, &snapshot, &Type::Record("event".into())).unwrap();
        assert!(body.contains("record.clazz = toObjectKind(map.get(\"class\"));"));
        assert!(body.contains("case VM:"));
        assert!(body.contains("record.snapshot = toVMRecord(snapshot);"));
        // Field-less classes have no record type and therefore no case.
        assert!(!body.contains("case SESSION:"));
        // Runtime-unknown kinds keep the raw value rather than failing.
        assert!(body.contains("record.snapshot = snapshot;"));
    }

    #[test]
    fn test_missing_snapshot_case_is_fatal() {
        let schema = ApiSchema {
            classes: vec![ApiClass {
                name: "VM".into(),
                description: String::new(),
                fields: vec![crate::schema::FieldNode::Leaf(crate::schema::Field {
                    name: "name_label".into(),
                    ty: Type::String,
                    description: String::new(),
                    deprecated: false,
                })],
                messages: vec![],
            }],
            errors: vec![],
        };
        // The event record is registered but VM's layout never was.
        let snapshot = snapshot_with(|ctx| {
            ctx.register_record(
                "event",
                vec![RecordField {
                    path: "id".into(),
                    ty: Type::Int,
                }],
            );
        });
        let result = decode_body(&schema, &snapshot, &Type::Record("event".into()));
        assert!(matches!(result, Err(GenError::MissingSnapshotCase(cls)) if cls == "VM"));
    }

    #[test]
    fn test_date_decode_has_epoch_fallback() {
        let snapshot = snapshot_with(|_| {});
        let body = decode_body(&empty_schema(), &snapshot, &Type::DateTime).unwrap();
        assert!(body.contains("return (Date) object;"));
        assert!(body.contains("catch (ClassCastException e)"));
        assert!(body.contains("new Date(Long.parseLong((String) object) * 1000L);"));
    }

    #[test]
    fn test_support_context_flags_and_dedup() {
        let schema = empty_schema();
        let snapshot = snapshot_with(|ctx| {
            ctx.note_type(&Type::String);
            ctx.note_type(&Type::SecretString);
            ctx.note_type(&Type::Ref("VM".into()));
            ctx.note_type(&Type::Map(Box::new(Type::String), Box::new(Type::String)));
        });
        let context = build_support_context(&schema, &snapshot).unwrap();
        // String and SecretString collapse into one decode function.
        let names: Vec<_> = context.decoders.iter().map(|d| d.fn_name.as_str()).collect();
        assert_eq!(names, ["toString", "toVM", "toMapOfStringString"]);
        let vm = &context.decoders[1];
        assert!(vm.is_ref);
        assert!(!vm.suppress_unchecked);
        let map = &context.decoders[2];
        assert!(map.suppress_unchecked);
        assert!(!map.is_ref);
    }

    #[test]
    fn test_error_entries_keep_positional_field_order() {
        let schema = ApiSchema {
            classes: vec![],
            errors: vec![ErrorDef {
                name: "vm_bad_power_state".into(),
                fields: vec!["vm".into(), "expected".into(), "actual".into()],
                description: "The operation cannot be performed in this state.".into(),
            }],
        };
        let snapshot = snapshot_with(|_| {});
        let context = build_support_context(&schema, &snapshot).unwrap();
        assert_eq!(context.errors.len(), 1);
        assert_eq!(context.errors[0].class_name, "VmBadPowerState");
        assert_eq!(context.errors[0].fields, ["vm", "expected", "actual"]);
    }

    #[test]
    fn test_enum_entries_normalize_constants() {
        let snapshot = snapshot_with(|ctx| {
            ctx.register_enum(
                "vif_locking_mode",
                &[
                    EnumMember {
                        value: "network-default".into(),
                        description: "Inherit the network's setting".into(),
                    },
                    EnumMember {
                        value: "locked".into(),
                        description: String::new(),
                    },
                ],
            );
        });
        let context = build_support_context(&empty_schema(), &snapshot).unwrap();
        assert_eq!(context.enums[0].class_name, "VifLockingMode");
        assert_eq!(context.enums[0].members[0].constant, "NETWORK_DEFAULT");
        assert_eq!(context.enums[0].members[0].wire, "network-default");
    }
}
