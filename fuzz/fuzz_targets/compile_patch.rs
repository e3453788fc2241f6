#![no_main]

use fragpatch::{FragmentSource, Instruction, LiveTree, compile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(patch) = compile(FragmentSource::Bytes(data)) else {
        return;
    };
    let mut depth = 0usize;
    for instruction in patch.instructions() {
        match instruction {
            Instruction::OpenTag { .. } => depth += 1,
            Instruction::CloseTag { .. } => {
                depth = depth.checked_sub(1).expect("close without open");
            }
            Instruction::EmitText { .. } | Instruction::Skip => assert!(depth > 0),
        }
    }
    assert_eq!(depth, 0, "unbalanced program");

    let mut tree = LiveTree::new();
    let root = tree.root();
    patch.apply(&mut tree, root).expect("compiled programs always replay");
    let count = tree.live_count();
    patch.apply(&mut tree, root).expect("second replay");
    assert_eq!(count, tree.live_count(), "replay is idempotent");
});
