//! Cross-phase generation registries.
//!
//! Phase 1 (class emission) accumulates three registries in a
//! `GenerationContext` threaded `&mut` through every emitter; phase 2 (the
//! marshalling generator) consumes them through an immutable
//! `ContextSnapshot`. The snapshot is produced by value, so once phase 2
//! holds it no further registration is possible: the phase-ordering
//! invariant is enforced by ownership, not by convention.

use std::collections::{HashMap, HashSet};

use crate::schema::{EnumMember, Type};

/// One entry of a record's flattened field layout: the wire path and the
/// field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub path: String,
    pub ty: Type,
}

/// Mutable registries populated during phase 1.
#[derive(Debug, Default)]
pub struct GenerationContext {
    encountered: Vec<Type>,
    seen: HashSet<Type>,
    enum_order: Vec<String>,
    enums: HashMap<String, Vec<EnumMember>>,
    record_order: Vec<String>,
    records: HashMap<String, Vec<RecordField>>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a type passed through the resolution engine. Idempotent;
    /// first-encounter order is preserved for deterministic output.
    pub fn note_type(&mut self, ty: &Type) {
        if self.seen.insert(ty.clone()) {
            self.encountered.push(ty.clone());
        }
    }

    /// Register an enum's value list. The schema guarantees one definition
    /// per name, so last registration winning is safe.
    pub fn register_enum(&mut self, name: &str, values: &[EnumMember]) {
        if self.enums.insert(name.to_string(), values.to_vec()).is_none() {
            self.enum_order.push(name.to_string());
        }
    }

    /// Register a class's flattened field layout, once, during that class's
    /// own emission.
    pub fn register_record(&mut self, class: &str, fields: Vec<RecordField>) {
        if self.records.insert(class.to_string(), fields).is_none() {
            self.record_order.push(class.to_string());
        }
    }

    /// Freeze the registries for phase 2. Consumes the context.
    pub fn into_snapshot(self) -> ContextSnapshot {
        let enums = self
            .enum_order
            .iter()
            .filter_map(|name| {
                self.enums
                    .get(name)
                    .map(|values| (name.clone(), values.clone()))
            })
            .collect();
        ContextSnapshot {
            encountered: self.encountered,
            enums,
            records: self.records,
        }
    }
}

/// Immutable view of the registries, consumed by the marshalling generator.
#[derive(Debug)]
pub struct ContextSnapshot {
    encountered: Vec<Type>,
    enums: Vec<(String, Vec<EnumMember>)>,
    records: HashMap<String, Vec<RecordField>>,
}

impl ContextSnapshot {
    /// Every distinct type resolved during the run, in first-seen order.
    pub fn encountered_types(&self) -> &[Type] {
        &self.encountered
    }

    /// Registered enums in first-registration order.
    pub fn enums(&self) -> &[(String, Vec<EnumMember>)] {
        &self.enums
    }

    /// A class's flattened field layout, if one was registered.
    pub fn record_fields(&self, class: &str) -> Option<&[RecordField]> {
        self.records.get(class).map(Vec::as_slice)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_note_type_is_idempotent() {
        let mut ctx = GenerationContext::new();
        ctx.note_type(&Type::String);
        ctx.note_type(&Type::Int);
        ctx.note_type(&Type::String);
        let snapshot = ctx.into_snapshot();
        assert_eq!(snapshot.encountered_types(), &[Type::String, Type::Int]);
    }

    #[test]
    fn test_structural_equality_dedupes() {
        let mut ctx = GenerationContext::new();
        ctx.note_type(&Type::Set(Box::new(Type::Ref("VM".into()))));
        ctx.note_type(&Type::Set(Box::new(Type::Ref("VM".into()))));
        ctx.note_type(&Type::Set(Box::new(Type::Ref("SR".into()))));
        assert_eq!(ctx.into_snapshot().encountered_types().len(), 2);
    }

    #[test]
    fn test_enum_last_registration_wins() {
        let member = |v: &str| EnumMember {
            value: v.into(),
            description: String::new(),
        };
        let mut ctx = GenerationContext::new();
        ctx.register_enum("power_state", &[member("running")]);
        ctx.register_enum("vif_locking_mode", &[member("locked")]);
        ctx.register_enum("power_state", &[member("running"), member("halted")]);
        let snapshot = ctx.into_snapshot();
        // Order keeps first registration; values keep the last.
        assert_eq!(snapshot.enums()[0].0, "power_state");
        assert_eq!(snapshot.enums()[0].1.len(), 2);
        assert_eq!(snapshot.enums()[1].0, "vif_locking_mode");
    }

    #[test]
    fn test_record_registry_lookup() {
        let mut ctx = GenerationContext::new();
        ctx.register_record(
            "VM",
            vec![RecordField {
                path: "name_label".into(),
                ty: Type::String,
            }],
        );
        let snapshot = ctx.into_snapshot();
        assert_eq!(snapshot.record_fields("VM").unwrap().len(), 1);
        assert!(snapshot.record_fields("SR").is_none());
    }
}
