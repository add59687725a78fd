//! Shared test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};

/// Get the path to the smelt binary (target/debug/smelt)
///
/// This is shared across all integration tests to avoid duplication.
pub(crate) fn get_smelt_binary() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("target/debug/smelt")
        .to_string_lossy()
        .to_string()
}

/// Create an extracted-looking source tree under `root` with a `src/`
/// build directory but no build output yet.
#[allow(dead_code)]
pub(crate) fn create_unbuilt_tree(root: &Path, name: &str) -> PathBuf {
    let tree = root.join(name);
    fs::create_dir_all(tree.join("src")).expect("Failed to create source tree");
    fs::write(tree.join("Makefile"), "all:\n").expect("Failed to write Makefile");
    fs::write(tree.join("src/luajit.c"), "").expect("Failed to write source file");
    tree
}

/// Create a source tree that already contains a build output.
///
/// `library` is the artifact filename to plant, e.g. `libluajit.a` or
/// `lua51.lib`.
#[allow(dead_code)]
pub(crate) fn create_built_tree(root: &Path, name: &str, library: &str) -> PathBuf {
    let tree = create_unbuilt_tree(root, name);
    fs::write(tree.join("src").join(library), b"built").expect("Failed to write library file");
    tree
}

/// Write a gzip tarball at `dest` whose entries all live under `dir/`.
#[allow(dead_code)]
pub(crate) fn write_source_tarball(dest: &Path, dir: &str, files: &[&str]) {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let file = fs::File::create(dest).expect("Failed to create tarball");
    let gz = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(gz);

    for name in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{dir}/{name}"), &b""[..])
            .expect("Failed to append tar entry");
    }

    builder
        .into_inner()
        .expect("Failed to finish tar stream")
        .finish()
        .expect("Failed to finish gzip stream")
        .flush()
        .expect("Failed to flush tarball");
}

/// Create a stub build tool that runs `script` via `/bin/sh`.
///
/// Returns the absolute path to pass as `--make` or `SMELT_MAKE`.
#[allow(dead_code)]
#[cfg(unix)]
pub(crate) fn create_stub_make(dir: &Path, script: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("stub-make");
    fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("Failed to write stub");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to mark stub executable");
    path.to_string_lossy().to_string()
}
