//! Fan-out over independent accounts.
//!
//! With the `parallel` feature the work is spread over the rayon pool once
//! the batch reaches [`AnalyticsConfig::parallel_threshold`]; otherwise it
//! runs inline on the calling thread.

use crate::config::AnalyticsConfig;

/// Applies `f` to every item, in parallel when the config allows it.
///
/// Results are returned in input order either way.
#[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &AnalyticsConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            tracing::debug!(items = items.len(), "fanning out over rayon pool");
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_config_runs_inline() {
        let config = AnalyticsConfig::sequential();
        let doubled: Vec<i32> = maybe_parallel_map(&[1, 2, 3, 4, 5], &config, |x| x * 2);
        assert_eq!(doubled, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_order_kept_above_threshold() {
        let config = AnalyticsConfig::default().with_threshold(4);
        let ids: Vec<u32> = (0..64).collect();
        let next = maybe_parallel_map(&ids, &config, |x| x + 1);
        assert_eq!(next, (1..65).collect::<Vec<_>>());
    }
}
