//! Generation pipeline driver.
//!
//! Two phases with a hard ordering guarantee: phase 1 emits every class
//! unit and populates the registries; phase 2 consumes the frozen snapshot
//! to produce the shared support unit. Each artifact is opened, written,
//! and closed within its own step. A failure anywhere aborts the run;
//! artifacts already written stay on disk and are overwritten by the next
//! successful run.

use std::fs;
use std::path::Path;

use tera::Tera;
use tracing::{debug, info};

use crate::r#gen::class::emit_class;
use crate::r#gen::context::GenerationContext;
use crate::r#gen::error::GenError;
use crate::r#gen::ident::class_case;
use crate::r#gen::marshal::{build_support_context, SupportContext};
use crate::schema::ApiSchema;

const SUPPORT_TEMPLATE: &str = include_str!("../../templates/types.java.tera");
const LICENSE_NOTICE: &str = include_str!("../../templates/LICENSE.txt");

/// Run one complete generation: every class unit, the shared support unit,
/// and the license notice, written under `out_dir`.
pub fn generate(schema: &ApiSchema, out_dir: &Path) -> Result<(), GenError> {
    fs::create_dir_all(out_dir).map_err(|source| GenError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    // Phase 1. Registries fill up while classes are emitted.
    let mut ctx = GenerationContext::new();
    for class in &schema.classes {
        let source = emit_class(&mut ctx, schema, class)?;
        let path = out_dir.join(format!("{}.java", class_case(&class.name)));
        debug!(class = %class.name, path = %path.display(), "Writing class binding.");
        write_file(&path, &source)?;
    }

    // Phase 2. The snapshot consumes the context by value, so nothing can
    // register past this point.
    let snapshot = ctx.into_snapshot();
    let support = build_support_context(schema, &snapshot)?;
    let rendered = render_support(&support)?;
    let types_path = out_dir.join("Types.java");
    debug!(
        path = %types_path.display(),
        enums = support.enums.len(),
        decoders = support.decoders.len(),
        "Writing support unit."
    );
    write_file(&types_path, &rendered)?;

    write_file(&out_dir.join("LICENSE.txt"), LICENSE_NOTICE)?;

    info!(classes = schema.classes.len(), "Generation complete.");
    Ok(())
}

/// Render the support unit through the template collaborator.
pub fn render_support(context: &SupportContext) -> Result<String, GenError> {
    let mut tera = Tera::default();
    tera.add_raw_template("types.java", SUPPORT_TEMPLATE)?;
    Ok(tera.render("types.java", &tera::Context::from_serialize(context)?)?)
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenError> {
    fs::write(path, contents).map_err(|source| GenError::Write {
        path: path.to_path_buf(),
        source,
    })
}
