//! Record field-tree emission.
//!
//! A single traversal walks a class's field tree and produces three
//! fragment lists at once: member declarations, `toString` lines, and
//! `toMap` lines. Sharing the traversal is what guarantees the three
//! appear in the identical order. The flattened (path, type) layout is
//! registered in the record registry as a side effect; phase 2 needs it to
//! generate the class's decode function.

use crate::r#gen::context::{GenerationContext, RecordField};
use crate::r#gen::error::GenError;
use crate::r#gen::ident::camel_case;
use crate::r#gen::resolve::{default_value_literal, target_type_name};
use crate::schema::{ApiClass, Field, FieldNode};

/// The three fragment kinds produced by one traversal, element-aligned.
#[derive(Debug, Default)]
pub struct RecordFragments {
    pub declarations: Vec<String>,
    pub to_string: Vec<String>,
    pub to_map: Vec<String>,
}

/// Emit a class's record fragments and register its flattened layout.
pub fn emit_record_fragments(
    ctx: &mut GenerationContext,
    class: &ApiClass,
) -> Result<RecordFragments, GenError> {
    let mut fragments = RecordFragments::default();
    let mut flat = Vec::new();
    for node in &class.fields {
        walk(ctx, &[], node, &mut fragments, &mut flat)?;
    }
    ctx.register_record(&class.name, flat);
    Ok(fragments)
}

fn walk(
    ctx: &mut GenerationContext,
    prefix: &[&str],
    node: &FieldNode,
    fragments: &mut RecordFragments,
    flat: &mut Vec<RecordField>,
) -> Result<(), GenError> {
    match node {
        FieldNode::Namespace { name, children } => {
            let mut deeper = prefix.to_vec();
            deeper.push(name);
            for child in children {
                walk(ctx, &deeper, child, fragments, flat)?;
            }
            Ok(())
        }
        FieldNode::Leaf(field) => {
            let path = wire_path(prefix, &field.name);
            let (declaration, to_string, to_map) = leaf_fragments(ctx, &path, field)?;
            fragments.declarations.push(declaration);
            fragments.to_string.push(to_string);
            fragments.to_map.push(to_map);
            flat.push(RecordField {
                path,
                ty: field.ty.clone(),
            });
            Ok(())
        }
    }
}

/// The wire key for a leaf: ancestor namespace names and the leaf name
/// joined by the schema separator.
fn wire_path(prefix: &[&str], name: &str) -> String {
    let mut segments = prefix.to_vec();
    segments.push(name);
    segments.join("_")
}

/// The three fragments for one leaf field. Also used by the class emitter
/// for the event class's synthetic members, keeping their shape identical
/// to traversed fields.
pub fn leaf_fragments(
    ctx: &mut GenerationContext,
    path: &str,
    field: &Field,
) -> Result<(String, String, String), GenError> {
    let java_name = camel_case(path);
    let java_type = target_type_name(ctx, &field.ty);
    let default = default_value_literal(ctx, &field.ty)?;

    let mut declaration = String::new();
    if !field.description.is_empty() {
        declaration.push_str(&format!(
            "        /**\n         * {}\n         */\n",
            field.description
        ));
    }
    declaration.push_str(&format!("        @JsonProperty(\"{path}\")\n"));
    if field.deprecated {
        declaration.push_str("        @Deprecated\n");
    }
    declaration.push_str(&format!("        public {java_type} {java_name};\n"));

    let to_string = format!(
        "            print.printf(\"%1$20s: %2$s\\n\", \"{java_name}\", this.{java_name});"
    );
    let to_map = format!(
        "            map.put(\"{path}\", this.{java_name} == null ? {default} : this.{java_name});"
    );
    Ok((declaration, to_string, to_map))
}
