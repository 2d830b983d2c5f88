use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=ADIOS2_DIR");

    if env::var_os("CARGO_FEATURE_ADIOS2").is_none() {
        return;
    }

    // Without ADIOS2_DIR we rely on the default linker search path.
    let prefix = match env::var("ADIOS2_DIR") {
        Ok(d) => PathBuf::from(d),
        Err(_) => return,
    };

    for lib_dir in ["lib", "lib64"] {
        let dir = prefix.join(lib_dir);
        if dir.is_dir() {
            println!("cargo:rustc-link-search=native={}", dir.display());
        }
    }
}
