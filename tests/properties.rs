//! Invariants over all sizes and both modes

use fibtree::layout::layout;
use fibtree::reveal::RevealConfig;
use fibtree::*;
use proptest::prelude::*;
mod common;
use common::naive_call_count;

fn mode() -> impl Strategy<Value = BuildMode> {
    prop_oneof![Just(BuildMode::Naive), Just(BuildMode::Memoized)]
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Step,
    Play,
    Skip,
    Tick,
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Step),
        Just(Command::Play),
        Just(Command::Skip),
        Just(Command::Tick),
    ]
}

proptest! {
    #[test]
    fn root_value_matches_reference(n in 0i64..=12, mode in mode()) {
        let tree = build(n, mode).expect("build succeeds");
        prop_assert_eq!(tree.root().value, fibonacci(n as u32));
    }

    #[test]
    fn memoized_root_matches_reference_up_to_u64_limit(n in 0i64..=93) {
        let tree = build(n, BuildMode::Memoized).expect("build succeeds");
        prop_assert_eq!(tree.root().value, fibonacci(n as u32));
    }

    #[test]
    fn naive_calls_match_recursive_counter(n in 0u32..=12) {
        let tree = build(i64::from(n), BuildMode::Naive).expect("build succeeds");
        prop_assert_eq!(tree.stats().total_calls, naive_call_count(n));
        prop_assert_eq!(tree.stats().total_calls as u64, 2 * fibonacci(n + 1) - 1);
        prop_assert_eq!(tree.stats().cached_calls, 0);
    }

    #[test]
    fn memoized_calls_are_linear(n in 2u32..=93) {
        let tree = build(i64::from(n), BuildMode::Memoized).expect("build succeeds");
        let stats = tree.stats();
        prop_assert_eq!(stats.total_calls, 2 * n as usize - 1);
        prop_assert_eq!(stats.unique_computations(), n as usize + 1);
        prop_assert_eq!(stats.cached_calls, stats.total_calls - (n as usize + 1));
        prop_assert_eq!(tree.memo().len(), n as usize + 1);
    }

    #[test]
    fn traversal_is_pre_order(n in 0i64..=12, mode in mode()) {
        let tree = build(n, mode).expect("build succeeds");
        let order = tree.traversal();
        prop_assert_eq!(order.get(0), Some(tree.root_id()));
        prop_assert_eq!(order.len(), tree.len());
        for (id, node) in tree.iter() {
            let at = order.position_of(id).expect("every node is ordered");
            for &child in node.children() {
                prop_assert!(order.position_of(child).unwrap() > at);
            }
        }
    }

    #[test]
    fn layout_invariants(n in 0i64..=12, mode in mode()) {
        let mut tree = build(n, mode).expect("build succeeds");
        let summary = layout(&mut tree);
        prop_assert_eq!(summary.width as usize, tree.leaf_count());

        let mut leaf_xs = Vec::new();
        for (_, node) in tree.iter() {
            let p = node.position().expect("laid out");
            if let Some(parent) = node.parent {
                let pp = tree.get(parent).unwrap().position().unwrap();
                prop_assert!(p.y > pp.y, "y grows with depth");
            }
            match node.children() {
                [] => leaf_xs.push(p.x),
                children => {
                    let xs: Vec<f64> = children
                        .iter()
                        .map(|&c| tree.get(c).unwrap().position().unwrap().x)
                        .collect();
                    let lo = xs.iter().cloned().fold(f64::INFINITY, f64::min);
                    let hi = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    prop_assert!(lo <= p.x && p.x <= hi);
                }
            }
        }
        let count = leaf_xs.len();
        leaf_xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        leaf_xs.dedup();
        prop_assert_eq!(leaf_xs.len(), count, "leaf x slots are unique");
    }

    #[test]
    fn reveal_index_is_monotonic(
        n in 0i64..=8,
        mode in mode(),
        commands in proptest::collection::vec(command(), 0..64),
    ) {
        let mut tree = build(n, mode).expect("build succeeds");
        layout(&mut tree);
        let mut controller = RevealController::new(tree, RevealConfig::default());
        controller.start(true);

        let mut previous = controller.index();
        for cmd in commands {
            match cmd {
                Command::Step => { controller.step(); }
                Command::Play => { controller.play(); }
                Command::Skip => { controller.skip(); }
                Command::Tick => { controller.tick(); }
            }
            prop_assert!(controller.index() >= previous);
            prop_assert!(controller.index() <= controller.len());
            prop_assert_eq!(controller.ledger().revealed_nodes(), controller.index());
            previous = controller.index();
        }

        // Skip from wherever we are reaches the end
        controller.skip();
        while controller.pending_interval().is_some() {
            controller.tick();
            prop_assert!(controller.index() >= previous);
            previous = controller.index();
        }
        prop_assert!(controller.is_finished());
        prop_assert_eq!(controller.index(), controller.len());
        prop_assert_eq!(controller.ledger().visible_edges(), controller.len() - 1);
    }

    #[test]
    fn skip_matches_manual_steps(n in 0i64..=10, mode in mode()) {
        let run = |fast: bool| {
            let mut tree = build(n, mode).expect("build succeeds");
            layout(&mut tree);
            let mut controller = RevealController::new(tree, RevealConfig::default());
            let mut steps = controller.start(true);
            if fast {
                controller.skip();
                while controller.pending_interval().is_some() {
                    steps.extend(controller.tick());
                }
            } else {
                while let Some(step) = controller.step() {
                    steps.push(step);
                }
            }
            (steps, controller.node_items(), controller.edge_items())
        };
        prop_assert_eq!(run(true), run(false));
    }
}
