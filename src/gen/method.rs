//! Method emission: synchronous and asynchronous remote-call wrappers.
//!
//! Every message expands into one overload per droppable optional-suffix
//! length, and each overload is emitted as a full, independent method body.
//! Messages with an async counterpart additionally get a `...Async` form
//! returning a `Task` handle. The wire call is always
//! `"<class>.<message>"` (`"Async.<class>.<message>"` for the task form)
//! with positional arguments: session reference, receiver reference for
//! instance methods, then the declared parameters in schema order.

use crate::r#gen::context::GenerationContext;
use crate::r#gen::error::GenError;
use crate::r#gen::ident::{camel_case, class_case};
use crate::r#gen::resolve::{marshal_fn_name, target_type_name};
use crate::schema::{ApiClass, ApiSchema, Message, Param, Type};

/// Transport-level failures declared on every generated call, regardless of
/// the message's own error list.
const TRANSPORT_THROWS: &[(&str, &str)] = &[
    (
        "Types.BadServerResponse",
        "thrown if the response from the server was malformed",
    ),
    ("Types.ApiException", "thrown if the call failed"),
    ("IOException", "if the connection to the server failed"),
];

/// Internal release codenames mapped to the public product branding used in
/// documentation.
const RELEASE_BRANDING: &[(&str, &str)] = &[
    ("emerald", "Helios 5.0"),
    ("quartz", "Helios 5.5"),
    ("onyx", "Helios 6.0"),
    ("opal", "Helios 6.2"),
    ("garnet", "Helios 7.0"),
];

fn release_branding(version: &str) -> String {
    RELEASE_BRANDING
        .iter()
        .find(|(codename, _)| *codename == version)
        .map_or_else(|| version.to_string(), |(_, branding)| (*branding).to_string())
}

/// Emit every method of a class: all overloads of all messages, async form
/// first where one is declared.
pub fn emit_methods(
    ctx: &mut GenerationContext,
    schema: &ApiSchema,
    class: &ApiClass,
) -> Result<Vec<String>, GenError> {
    let mut methods = Vec::new();
    for message in &class.messages {
        for params in overload_param_sets(&message.params) {
            if message.has_async {
                methods.push(emit_method(ctx, schema, class, message, params, true)?);
            }
            methods.push(emit_method(ctx, schema, class, message, params, false)?);
        }
    }
    Ok(methods)
}

/// One parameter slice per overload, from all parameters present down to
/// the mandatory prefix. A message with k trailing optional parameters
/// yields k+1 slices.
pub(crate) fn overload_param_sets(params: &[Param]) -> Vec<&[Param]> {
    let optional_tail = params.iter().rev().take_while(|p| p.optional).count();
    (0..=optional_tail)
        .map(|dropped| &params[..params.len() - dropped])
        .collect()
}

fn emit_method(
    ctx: &mut GenerationContext,
    schema: &ApiSchema,
    class: &ApiClass,
    message: &Message,
    params: &[Param],
    async_form: bool,
) -> Result<String, GenError> {
    let mut out = String::new();
    out.push_str(&javadoc(ctx, schema, message, params, async_form));

    // Signature.
    let method_name = if async_form {
        format!("{}Async", camel_case(&message.name))
    } else {
        camel_case(&message.name)
    };
    let return_type = if async_form {
        "Task".to_string()
    } else {
        match &message.result {
            Some(result) => target_type_name(ctx, &result.ty),
            None => "void".to_string(),
        }
    };
    let static_kw = if message.is_static { "static " } else { "" };
    let mut signature_params = vec!["Connection c".to_string()];
    for param in params {
        signature_params.push(format!(
            "{} {}",
            target_type_name(ctx, &param.ty),
            camel_case(&param.name)
        ));
    }
    if message.deprecated_since.is_some() {
        out.push_str("    @Deprecated\n");
    }
    out.push_str(&format!(
        "    public {}{} {}({}) throws {} {{\n",
        static_kw,
        return_type,
        method_name,
        signature_params.join(", "),
        throws_clause(message),
    ));

    // Wire call construction.
    let wire_name = if async_form {
        format!("Async.{}.{}", class.name, message.name)
    } else {
        format!("{}.{}", class.name, message.name)
    };
    out.push_str(&format!("        String methodCall = \"{wire_name}\";\n"));

    let mut wire_args = Vec::new();
    if message.session_required {
        out.push_str("        String sessionRef = c.getSessionReference();\n");
        wire_args.push("sessionRef".to_string());
    }
    if !message.is_static {
        wire_args.push("this.ref".to_string());
    }
    for param in params {
        let java_name = camel_case(&param.name);
        if param.ty.is_record() {
            // Record arguments go on the wire as generic key/value maps.
            let map_name = format!("{java_name}Map");
            out.push_str(&format!(
                "        Map<String, Object> {map_name} = {java_name}.toMap();\n"
            ));
            wire_args.push(map_name);
        } else {
            wire_args.push(java_name);
        }
    }
    out.push_str(&format!(
        "        Object[] methodParams = {{{}}};\n",
        wire_args.join(", ")
    ));

    // Dispatch and result decoding.
    if async_form {
        let to_task = marshal_fn_name(ctx, &Type::Ref("task".into()));
        out.push_str("        Object result = c.dispatch(methodCall, methodParams);\n");
        out.push_str(&format!("        return Types.{to_task}(result);\n"));
    } else {
        match &message.result {
            Some(result) => {
                let decode = marshal_fn_name(ctx, &result.ty);
                out.push_str("        Object result = c.dispatch(methodCall, methodParams);\n");
                out.push_str(&format!("        return Types.{decode}(result);\n"));
            }
            None => {
                out.push_str("        c.dispatch(methodCall, methodParams);\n");
            }
        }
    }
    out.push_str("    }\n");
    Ok(out)
}

fn throws_clause(message: &Message) -> String {
    let mut throws: Vec<String> = TRANSPORT_THROWS
        .iter()
        .map(|(ty, _)| (*ty).to_string())
        .collect();
    for error in &message.errors {
        throws.push(format!("Types.{}", class_case(error)));
    }
    throws.join(", ")
}

fn javadoc(
    ctx: &mut GenerationContext,
    schema: &ApiSchema,
    message: &Message,
    params: &[Param],
    async_form: bool,
) -> String {
    let mut doc = String::from("    /**\n");
    if !message.description.is_empty() {
        doc.push_str(&format!("     * {}\n", message.description));
    }
    if let Some(published) = &message.published_since {
        doc.push_str(&format!(
            "     * First published in {}.\n",
            release_branding(published)
        ));
    }
    if let Some(role) = &message.min_role {
        doc.push_str(&format!("     * Minimum allowed role: {role}\n"));
    }
    doc.push_str("     *\n");
    doc.push_str("     * @param c The connection the call is made on\n");
    for param in params {
        let description = if param.description.is_empty() {
            "No description"
        } else {
            &param.description
        };
        doc.push_str(&format!(
            "     * @param {} {}\n",
            camel_case(&param.name),
            description
        ));
    }
    if async_form {
        doc.push_str("     * @return Task\n");
    } else if let Some(result) = &message.result {
        let description = if result.description.is_empty() {
            target_type_name(ctx, &result.ty)
        } else {
            result.description.clone()
        };
        doc.push_str(&format!("     * @return {description}\n"));
    }
    for (ty, description) in TRANSPORT_THROWS {
        doc.push_str(&format!("     * @throws {ty} {description}\n"));
    }
    for error in &message.errors {
        let description = schema
            .error_def(error)
            .map_or("", |def| def.description.as_str());
        doc.push_str(&format!(
            "     * @throws Types.{} {}\n",
            class_case(error),
            description
        ));
    }
    if let Some(deprecated) = &message.deprecated_since {
        doc.push_str(&format!(
            "     * @deprecated since {}\n",
            release_branding(deprecated)
        ));
    }
    doc.push_str("     */\n");
    doc
}
