//! Property tests for `IndexVec`'s push/index round-trip.

use ctf_util::index_vec::{Idx, IndexVec};
use quickcheck_macros::quickcheck;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PropId(u32);

impl Idx for PropId {
    fn from_usize(idx: usize) -> Self {
        PropId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[quickcheck]
fn push_then_get_round_trips(values: Vec<i64>) -> bool {
    let mut vec: IndexVec<PropId, i64> = IndexVec::new();
    let ids: Vec<PropId> = values.iter().map(|&v| vec.push(v)).collect();
    ids.iter().zip(values.iter()).all(|(&id, &v)| vec[id] == v)
}

#[quickcheck]
fn len_matches_number_of_pushes(count: u8) -> bool {
    let mut vec: IndexVec<PropId, ()> = IndexVec::new();
    for _ in 0..count {
        vec.push(());
    }
    vec.len() == count as usize
}
