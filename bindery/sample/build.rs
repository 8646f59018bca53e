use std::env;
use std::path::PathBuf;

use bindery_gen::config::TargetConfig;
use bindery_gen::output::generate_and_write;

fn main() {
    println!("cargo:rerun-if-changed=openapi/petstore.yaml");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let target = TargetConfig::new(
        "petstore",
        manifest_dir.join("openapi/petstore.yaml"),
        out_dir.join("petstore.rs"),
    )
    .with_client(true)
    .with_bundle(true);

    if let Err(e) = generate_and_write(&target, false) {
        panic!("failed to generate petstore bindings: {}", e);
    }
}
