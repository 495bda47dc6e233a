//! Differential test: the gap buffer against a plain `Vec<u8>` model.
//!
//! Any interleaving of inserts and deletes at arbitrary positions must leave
//! the logical text identical to the reference implementation.

use core_text::GapBuffer;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { pos: usize, bytes: Vec<u8> },
    Delete { pos: usize, len: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..512, proptest::collection::vec(any::<u8>(), 0..32))
            .prop_map(|(pos, bytes)| Op::Insert { pos, bytes }),
        (0usize..512, 0usize..48).prop_map(|(pos, len)| Op::Delete { pos, len }),
    ]
}

proptest! {
    #[test]
    fn matches_vec_model(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut gb = GapBuffer::new(16);
        let mut model: Vec<u8> = Vec::new();
        for op in ops {
            match op {
                Op::Insert { pos, bytes } => {
                    let pos = pos.min(model.len());
                    prop_assert!(gb.insert(pos, &bytes));
                    model.splice(pos..pos, bytes.iter().copied());
                }
                Op::Delete { pos, len } => {
                    let pos = pos.min(model.len());
                    let end = (pos + len).min(model.len());
                    gb.delete(pos, end - pos);
                    model.drain(pos..end);
                }
            }
            prop_assert_eq!(gb.len(), model.len());
            prop_assert_eq!(gb.to_bytes(), model.clone());
        }
    }

    #[test]
    fn copy_range_matches_model(bytes in proptest::collection::vec(any::<u8>(), 0..256),
                                split in 0usize..256,
                                start in 0usize..300,
                                end in 0usize..300) {
        let mut gb = GapBuffer::new(8);
        prop_assert!(gb.insert(0, &bytes));
        // Park the gap somewhere in the middle via a no-net-change edit.
        let split = split.min(bytes.len());
        gb.insert(split, b"x");
        gb.delete(split, 1);
        let hi = end.min(bytes.len());
        let lo = start.min(hi);
        prop_assert_eq!(gb.copy_range(lo, hi), bytes[lo..hi].to_vec());
    }
}
