use super::fixtures::ParentRecord;
use proptest::prelude::*;

/// Parent sets with heavily duplicated names, so the identity tie-breaker matters
pub fn parent_set_strategy() -> impl Strategy<Value = Vec<ParentRecord>> {
    prop::collection::vec(("[A-C]", prop::option::of("[xy]")), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (name, group_key))| ParentRecord {
                id: index as i64 + 1,
                name,
                group_key,
            })
            .collect()
    })
}

/// Page sizes including the zero-limit probe
pub fn page_size_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), 1u32..12]
}
