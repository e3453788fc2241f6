use html_test_support::{assert_lines_eq, escape_text};
use html_test_support::fixtures::{FragmentCase, load_cases};
use idom::{LiveTree, NodeRef, SnapshotOptions};
use patch_compiler::compile;

fn tree_cases() -> Vec<(FragmentCase, Vec<String>)> {
    let cases: Vec<_> = load_cases()
        .into_iter()
        .filter_map(|case| case.tree.clone().map(|tree| (case, tree)))
        .collect();
    assert!(!cases.is_empty(), "no fixture pins a tree");
    cases
}

fn all_nodes(tree: &LiveTree) -> Vec<NodeRef> {
    let mut out = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(tree.children(node).iter().rev().copied());
    }
    out
}

#[test]
fn fixture_trees_match_after_replay() {
    for (case, expected) in tree_cases() {
        let patch = compile(case.input.as_str()).expect("fixture compiles");
        let mut live = LiveTree::new();
        let root = live.root();
        patch.apply(&mut live, root).expect("replay");
        let actual = live.snapshot(root, SnapshotOptions::default());
        assert_lines_eq(&case.name, &expected, &actual);
    }
}

#[test]
fn replaying_the_same_patch_keeps_every_node() {
    for (case, _) in tree_cases() {
        let patch = compile(case.input.as_str()).expect("fixture compiles");
        let mut live = LiveTree::new();
        let root = live.root();
        patch.apply(&mut live, root).expect("first replay");
        let before = all_nodes(&live);
        let keyed = live.snapshot(root, SnapshotOptions { include_keys: true });
        patch.apply(&mut live, root).expect("second replay");
        assert_eq!(before, all_nodes(&live), "{}", case.name);
        assert_eq!(
            keyed,
            live.snapshot(root, SnapshotOptions { include_keys: true }),
            "{}",
            case.name
        );
    }
}

#[test]
fn recompiled_patch_yields_the_same_structure() {
    for (case, expected) in tree_cases() {
        let mut live = LiveTree::new();
        let root = live.root();
        compile(case.input.as_str())
            .expect("fixture compiles")
            .apply(&mut live, root)
            .expect("first replay");
        compile(case.input.as_str())
            .expect("fixture compiles")
            .apply(&mut live, root)
            .expect("replay of a fresh compile");
        let actual = live.snapshot(root, SnapshotOptions::default());
        assert_lines_eq(&case.name, &expected, &actual);
    }
}

#[test]
fn serialized_trees_compile_back_to_themselves() {
    for (case, expected) in tree_cases() {
        let mut first = LiveTree::new();
        let root = first.root();
        compile(case.input.as_str())
            .expect("fixture compiles")
            .apply(&mut first, root)
            .expect("replay");
        let markup = first.outer_html(root);

        let mut second = LiveTree::new();
        let root = second.root();
        compile(markup.as_str())
            .expect("serialized markup compiles")
            .apply(&mut second, root)
            .expect("replay");
        let actual = second.snapshot(root, SnapshotOptions::default());
        assert_lines_eq(&case.name, &expected, &actual);
    }
}

#[test]
fn snapshot_text_lines_are_escaped() {
    let text = "line \"1\"\n\tline 2\\";
    let patch = compile(format!("<pre>{text}</pre>")).expect("compile");
    let mut live = LiveTree::new();
    let root = live.root();
    patch.apply(&mut live, root).expect("replay");
    assert_eq!(
        live.snapshot(root, SnapshotOptions::default()),
        vec!["<pre>".to_string(), format!("  \"{}\"", escape_text(text))]
    );
}
