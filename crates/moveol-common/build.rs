//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Build metadata capture for version reporting."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Source tarballs have no git metadata; vergen falls back to defaults there.
    EmitBuilder::builder().all_build().all_cargo().all_git().emit()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
