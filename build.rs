use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    // Place puzzle text and config next to the built executable
    let target_dir = target_dir();
    copy_content(&target_dir);
    copy_config(&target_dir);
}

/// Resolves target/<profile> from OUT_DIR.
fn target_dir() -> PathBuf {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    // OUT_DIR is target/<profile>/build/human-ocr-xxx/out
    Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .expect("Could not find target directory")
        .to_path_buf()
}

/// Copies the sentence bundles so the executable finds them in `content/`.
fn copy_content(target_dir: &Path) {
    let content_src = Path::new("content");
    if content_src.exists() {
        copy_dir_recursive(content_src, &target_dir.join("content"));
        println!("cargo:rerun-if-changed=content/");
    }
}

/// Recursively copies a directory and its contents.
fn copy_dir_recursive(src: &Path, dst: &Path) {
    let _ = fs::create_dir_all(dst);

    if let Ok(entries) = fs::read_dir(src) {
        for entry in entries.flatten() {
            let src_path = entry.path();
            let dst_path = dst.join(entry.file_name());

            if src_path.is_dir() {
                copy_dir_recursive(&src_path, &dst_path);
            } else {
                let _ = fs::copy(&src_path, &dst_path);
            }
        }
    }
}

/// Copies config.json to the target directory.
fn copy_config(target_dir: &Path) {
    let config_src = Path::new("config.json");
    if config_src.exists() {
        let _ = fs::copy(config_src, target_dir.join("config.json"));
        println!("cargo:rerun-if-changed=config.json");
    }
}
