use proptest::prelude::*;

/// Strategy for generating page sizes
pub fn page_size_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(10u64), 1u64..=50]
}

/// Strategy for generating total limits, including the empty job
pub fn total_limit_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..=600]
}

/// Strategy for generating collection sizes smaller, equal to and larger than typical limits
pub fn collection_size_strategy() -> impl Strategy<Value = u64> {
    0u64..=400
}

/// Strategy for generating `(total_limit, page_size, step)` where the step may
/// run past the end of the job
pub fn plan_input_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
    (total_limit_strategy(), page_size_strategy()).prop_flat_map(|(total_limit, page_size)| {
        let max_step = total_limit.div_ceil(page_size) + 3;
        (Just(total_limit), Just(page_size), 1u64..=max_step)
    })
}
