use std::collections::HashSet;

use fibtree::{build, BuildMode, BuildRequest, Visualizer, VisualizerConfig};

#[test]
fn builds_are_reproducible() {
    for mode in [BuildMode::Naive, BuildMode::Memoized] {
        let mut fingerprints = HashSet::new();
        for _ in 0..5 {
            let tree = build(10, mode).expect("build succeeds");
            fingerprints.insert(tree.fingerprint());
        }
        assert_eq!(fingerprints.len(), 1, "{mode} builds diverged across runs");
    }
}

#[test]
fn rebuild_does_not_reuse_memo_state() {
    let mut vis = Visualizer::new(VisualizerConfig::default());
    vis.build(BuildRequest::new(8, BuildMode::Memoized, false).unwrap())
        .expect("first build");
    let first = vis.session().unwrap().tree().fingerprint();

    vis.build(BuildRequest::new(3, BuildMode::Memoized, false).unwrap())
        .expect("second build");
    vis.build(BuildRequest::new(8, BuildMode::Memoized, false).unwrap())
        .expect("third build");
    let third = vis.session().unwrap().tree();

    assert_eq!(third.fingerprint(), first);
    assert_eq!(third.stats().total_calls, 15);
}

#[test]
fn layout_is_reproducible() {
    let positions = |_: usize| {
        let mut vis = Visualizer::new(VisualizerConfig::default());
        vis.build(BuildRequest::new(9, BuildMode::Naive, false).unwrap())
            .expect("build succeeds");
        vis.session()
            .unwrap()
            .controller()
            .node_items()
            .into_iter()
            .map(|item| (item.position.x.to_bits(), item.position.y.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(0), positions(1));
}
