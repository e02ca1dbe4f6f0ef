//! Schema-driven Java client-binding generator.
//!
//! Consumes an abstract API schema (object classes with field trees and
//! remote-callable messages, shared enumerations, error definitions) and
//! emits one Java source unit per class plus a shared support unit
//! (`Types.java`) holding the enumerations, exception types, and wire-value
//! decode functions the class units depend on.
//!
//! The library entry point is [`generate`]; the schema model lives in
//! [`schema`] and the generation machinery in [`gen`].

pub mod r#gen;
pub mod schema;

pub use r#gen::error::GenError;
pub use r#gen::pipeline::generate;
