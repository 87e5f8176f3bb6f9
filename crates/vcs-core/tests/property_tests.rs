//! Random share/unshare sequences keep the registry invariants

mod common;

use common::Fixture;
use proptest::prelude::*;
use vcs_core::{ContainmentCheck, RegistryConfig};
use vcs_fs::PathPolicy;

#[derive(Debug, Clone)]
enum Op {
    Share(Vec<usize>),
    Unshare(usize),
}

/// Directory names that never contain one another as substrings, so the
/// only conflicts come from real nesting.
const NAMES: [&str; 4] = ["north", "south", "east", "west"];

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::collection::vec(0..NAMES.len(), 1..4).prop_map(Op::Share),
        1 => (0usize..8).prop_map(Op::Unshare),
    ]
}

fn relative(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| NAMES[i])
        .collect::<Vec<_>>()
        .join("/")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn shares_never_overlap_and_ids_never_repeat(ops in prop::collection::vec(op(), 1..24)) {
        let fx = Fixture::with_config(RegistryConfig {
            containment: ContainmentCheck::Ancestor,
            ..RegistryConfig::default()
        });
        let policy = PathPolicy::default();
        let mut issued: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                Op::Share(indices) => {
                    let dir = fx.mkdir(&relative(&indices));
                    if let Ok(root) = fx.access.share(&dir, 1) {
                        let id: u64 = root.id().parse().unwrap();
                        prop_assert!(issued.iter().all(|&prev| id > prev));
                        issued.push(id);
                    }
                }
                Op::Unshare(pick) => {
                    let roots = fx.access.roots();
                    if !roots.is_empty() {
                        let id = roots[pick % roots.len()].id().to_string();
                        fx.access.unshare(&id).unwrap();
                    }
                }
            }

            let roots = fx.access.roots();
            for (i, a) in roots.iter().enumerate() {
                for b in roots.iter().skip(i + 1) {
                    prop_assert!(!policy.is_ancestor_or_equal(a.local_path(), b.local_path()));
                    prop_assert!(!policy.is_ancestor_or_equal(b.local_path(), a.local_path()));
                }
            }
        }
    }
}
