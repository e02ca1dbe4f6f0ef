//! Per-class source unit composition.
//!
//! One generated Java file per API class: a reference wrapper whose
//! identity is the opaque reference string, an optional nested `Record`
//! value type built from the field-tree traversal, and the remote-call
//! wrappers. The event class gets two synthetic record members the schema
//! does not declare: the object-kind companion field and the polymorphic
//! snapshot.

use crate::r#gen::context::GenerationContext;
use crate::r#gen::error::GenError;
use crate::r#gen::ident::class_case;
use crate::r#gen::method::emit_methods;
use crate::r#gen::record::{emit_record_fragments, leaf_fragments, RecordFragments};
use crate::schema::{ApiClass, ApiSchema, EnumMember, Field, Type};

/// Notice prepended to every generated source unit.
pub const LICENSE_HEADER: &str = "/*\n * Copyright (c) Helios Project contributors.\n * SPDX-License-Identifier: BSD-2-Clause\n */\n";

/// Package every generated unit lives in.
pub const PACKAGE: &str = "com.helios.api";

const IMPORTS: &str = "import java.io.IOException;\n\
import java.io.PrintWriter;\n\
import java.io.StringWriter;\n\
import java.util.Date;\n\
import java.util.HashMap;\n\
import java.util.LinkedHashSet;\n\
import java.util.Map;\n\
import java.util.Set;\n\
\n\
import com.fasterxml.jackson.annotation.JsonProperty;\n";

/// The class whose record carries the synthetic snapshot members.
pub(crate) const EVENT_CLASS: &str = "event";

/// Emit one complete source unit for a class.
pub fn emit_class(
    ctx: &mut GenerationContext,
    schema: &ApiSchema,
    class: &ApiClass,
) -> Result<String, GenError> {
    let java_name = class_case(&class.name);
    let mut out = String::new();
    out.push_str(LICENSE_HEADER);
    out.push('\n');
    out.push_str(&format!("package {PACKAGE};\n\n"));
    out.push_str(IMPORTS);
    out.push('\n');

    if !class.description.is_empty() {
        out.push_str(&format!("/**\n * {}\n */\n", class.description));
    }
    out.push_str(&format!("public class {java_name} {{\n"));

    if class.has_fields() {
        out.push_str(&reference_wrapper(&java_name));
        let mut fragments = emit_record_fragments(ctx, class)?;
        if class.name == EVENT_CLASS {
            append_event_members(ctx, schema, &mut fragments)?;
        }
        out.push_str(&record_body(&java_name, &fragments));
    } else {
        // Field-less classes are not truly referenceable: no reference
        // field, and the wire-representation accessor returns null.
        out.push_str(
            "    /**\n     \
             * Objects of this class have no fields and no reference on the\n     \
             * wire; the reference accessor always returns null.\n     \
             */\n    \
             public String getRef() {\n        \
             return null;\n    \
             }\n",
        );
    }

    for method in emit_methods(ctx, schema, class)? {
        out.push('\n');
        out.push_str(&method);
    }
    out.push_str("}\n");
    Ok(out)
}

/// The opaque-reference wrapper: construction, accessor, and equality
/// defined purely on the reference string.
fn reference_wrapper(java_name: &str) -> String {
    format!(
        "    protected final String ref;\n\
         \n    \
         {java_name}(String ref) {{\n        \
         this.ref = ref;\n    \
         }}\n\
         \n    \
         /**\n     \
         * The opaque reference representing this object on the wire.\n     \
         */\n    \
         public String getRef() {{\n        \
         return this.ref;\n    \
         }}\n\
         \n    \
         @Override\n    \
         public boolean equals(Object object) {{\n        \
         if (object instanceof {java_name}) {{\n            \
         {java_name} other = ({java_name}) object;\n            \
         return other.ref.equals(this.ref);\n        \
         }}\n        \
         return false;\n    \
         }}\n\
         \n    \
         @Override\n    \
         public int hashCode() {{\n        \
         return this.ref.hashCode();\n    \
         }}\n"
    )
}

fn record_body(java_name: &str, fragments: &RecordFragments) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n    /**\n     * Represents all the fields in a {java_name}\n     */\n    \
         public static class Record implements Types.Record {{\n"
    ));
    for declaration in &fragments.declarations {
        out.push_str(declaration);
        out.push('\n');
    }
    out.push_str(
        "        @Override\n        \
         public String toString() {\n            \
         StringWriter writer = new StringWriter();\n            \
         PrintWriter print = new PrintWriter(writer);\n",
    );
    for line in &fragments.to_string {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(
        "            return writer.toString();\n        \
         }\n\
         \n        \
         /**\n         \
         * Convert this record to a generic key/value map.\n         \
         */\n        \
         public Map<String, Object> toMap() {\n            \
         Map<String, Object> map = new HashMap<>();\n",
    );
    for line in &fragments.to_map {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("            return map;\n        }\n    }\n");
    out
}

/// The synthesized enumeration over every field-bearing class, used to
/// dispatch polymorphic snapshot decoding.
pub fn object_kind_enum(schema: &ApiSchema) -> Type {
    Type::Enum {
        name: "object_kind".into(),
        values: schema
            .classes
            .iter()
            .filter(|c| c.has_fields())
            .map(|c| EnumMember {
                value: c.name.clone(),
                description: format!("The event is about a {}", c.name),
            })
            .collect(),
    }
}

/// Append the event record's hard-coded members: the object-kind companion
/// field (through the ordinary leaf emission, so its enum flows through the
/// resolution engine) and the snapshot field (hand-written fragments, since
/// no schema type describes a polymorphic value).
fn append_event_members(
    ctx: &mut GenerationContext,
    schema: &ApiSchema,
    fragments: &mut RecordFragments,
) -> Result<(), GenError> {
    let kind_field = Field {
        name: "class".into(),
        ty: object_kind_enum(schema),
        description: "The kind of object the event is about".into(),
        deprecated: false,
    };
    let (declaration, to_string, to_map) = leaf_fragments(ctx, "class", &kind_field)?;
    fragments.declarations.push(declaration);
    fragments.to_string.push(to_string);
    fragments.to_map.push(to_map);

    fragments.declarations.push(
        "        /**\n         \
         * The record of the object that was added, changed or deleted.\n         \
         */\n        \
         @JsonProperty(\"snapshot\")\n        \
         public Object snapshot;\n"
            .to_string(),
    );
    fragments.to_string.push(
        "            print.printf(\"%1$20s: %2$s\\n\", \"snapshot\", this.snapshot);".to_string(),
    );
    fragments
        .to_map
        .push("            map.put(\"snapshot\", this.snapshot);".to_string());
    Ok(())
}
