//! Java client-binding generation.
//!
//! The pipeline runs in two phases over the schema model:
//! 1. Per-class emission: each class becomes one source unit; the type
//!    resolution engine registers every encountered type, enum definition,
//!    and record layout into the generation context along the way.
//! 2. Marshalling generation: the frozen registry snapshot is turned into
//!    the support-unit context (decode functions, exception types, enums)
//!    and rendered through the template collaborator.
//!
//! ## Module structure
//!
//! - `ident`: identifier casing and escape tables
//! - `context`: cross-phase registries and the phase-2 snapshot
//! - `resolve`: the recursive type resolution engine
//! - `record`: field-tree traversal and record fragments
//! - `method`: call-wrapper emission and overload expansion
//! - `class`: per-class source unit composition
//! - `marshal`: phase-2 support-unit context
//! - `pipeline`: phase sequencing and file output
//! - `error`: the generation error taxonomy

pub mod class;
pub mod context;
pub mod error;
pub mod ident;
pub mod marshal;
pub mod method;
pub mod pipeline;
pub mod record;
pub mod resolve;
