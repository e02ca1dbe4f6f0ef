//! Identifier transforms for generated Java code.
//!
//! Schema identifiers are lowercase words joined by underscores, with
//! already-cased acronym segments (`VM`, `VCPUs`) left as-is. Two escape
//! tables apply at different stages: raw segments that collide with Java
//! constructs are rewritten before any case transform, and finished
//! camelCase identifiers that collide with Java keywords or `Object`
//! methods are rewritten after it.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Raw schema identifiers escaped before the case transform.
static RESERVED_WORDS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("class", "clazz"),
        ("interface", "iface"),
        ("enum", "enumeration"),
        ("import", "imprt"),
        ("public", "pubblic"),
    ]
    .into_iter()
    .collect()
});

/// Finished camelCase identifiers escaped after the case transform. Smaller
/// than the reserved table: only names that survive casing intact can still
/// collide.
static KEYWORDS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("clone", "createClone"),
        ("default", "defaultValue"),
        ("native", "nativeValue"),
        ("assert", "asserting"),
    ]
    .into_iter()
    .collect()
});

/// Escape a raw identifier that collides with a Java construct.
pub fn escape_reserved(raw: &str) -> &str {
    RESERVED_WORDS.get(raw).copied().unwrap_or(raw)
}

/// A segment whose second character is already uppercase is treated as an
/// acronym or properly cased word and left unchanged.
fn keeps_own_casing(segment: &str) -> bool {
    segment.chars().nth(1).is_some_and(|c| c.is_ascii_uppercase())
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn transform_segment(segment: &str) -> String {
    if keeps_own_casing(segment) {
        return segment.to_string();
    }
    capitalize_first(&escape_reserved(segment).to_ascii_lowercase())
}

/// Convert a schema name to a Java class name: `vm_guest_metrics` →
/// `VmGuestMetrics`, `VBD_metrics` → `VBDMetrics`.
pub fn class_case(name: &str) -> String {
    name.split('_')
        .filter(|s| !s.is_empty())
        .map(transform_segment)
        .collect()
}

/// Convert a schema name to a Java member name: `name_label` → `nameLabel`,
/// `VCPUs_max` → `VCPUsMax`. The result is passed through the keyword table.
pub fn camel_case(name: &str) -> String {
    let mut out = String::new();
    for (i, segment) in name.split('_').filter(|s| !s.is_empty()).enumerate() {
        if i == 0 && !keeps_own_casing(segment) {
            out.push_str(&escape_reserved(segment).to_ascii_lowercase());
        } else {
            out.push_str(&transform_segment(segment));
        }
    }
    match KEYWORDS.get(out.as_str()) {
        Some(escaped) => (*escaped).to_string(),
        None => out,
    }
}

/// Normalize an enum wire value to its generated constant name: separator
/// to underscore, then uppercase. Decode uses the same normalization for
/// case-insensitive matching.
pub fn enum_wire_to_constant(wire_value: &str) -> String {
    wire_value.replace('-', "_").to_ascii_uppercase()
}
