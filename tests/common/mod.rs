use std::fs;
use std::path::{Path, PathBuf};

use fibtree::{BuildMode, BuildRequest, Visualizer, VisualizerConfig};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

/// Compare `actual` with `tests/snapshots/<name>`.
#[allow(dead_code)]
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("FIBTREE_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set FIBTREE_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// Visualizer with a built session.
#[allow(dead_code)]
pub fn visualizer(n: i64, mode: BuildMode, animate: bool) -> Visualizer {
    let mut vis = Visualizer::new(VisualizerConfig::default());
    let request = BuildRequest::new(n, mode, animate).expect("valid request");
    vis.build(request).expect("build succeeds");
    vis
}

/// Call count of the textbook double recursion.
#[allow(dead_code)]
pub fn naive_call_count(n: u32) -> usize {
    if n <= 1 {
        1
    } else {
        1 + naive_call_count(n - 1) + naive_call_count(n - 2)
    }
}
