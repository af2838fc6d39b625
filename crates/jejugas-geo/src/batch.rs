//! Bounded-concurrency batch resolution

use std::time::Duration;

use futures::future::join_all;
use jejugas_core::models::{KatecPoint, WgsPoint};

use crate::resolver::CoordinateResolver;

/// Resolve `points` in chunks of `batch_size`, all members of a chunk concurrently.
///
/// Results come back in input order; `None` entries in the input stay `None`.
pub async fn resolve_batch(
    resolver: &CoordinateResolver,
    points: &[Option<KatecPoint>],
    batch_size: usize,
    timeout: Duration,
) -> Vec<Option<WgsPoint>> {
    let mut resolved = Vec::with_capacity(points.len());

    for chunk in points.chunks(batch_size.max(1)) {
        let outcomes = join_all(chunk.iter().map(|point| async move {
            match point {
                Some(katec) => resolver.resolve(*katec, timeout).await,
                None => None,
            }
        }))
        .await;
        resolved.extend(outcomes);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preserves_order_and_gaps() {
        let resolver = CoordinateResolver::offline();
        let points = vec![
            Some(KatecPoint::new(263_722.2, 101_365.127)),
            None,
            Some(KatecPoint::new(1_000_000.0, 1_000_000.0)),
            Some(KatecPoint::new(298_110.309, 112_077.110)),
        ];

        let resolved = resolve_batch(&resolver, &points, 2, Duration::from_millis(100)).await;

        assert_eq!(resolved.len(), 4);
        assert!(resolved[0].is_some());
        assert!(resolved[1].is_none());
        assert!(resolved[2].is_none());
        let last = resolved[3].unwrap();
        assert!((last.latitude - 33.6).abs() < 1e-5);
        assert!((last.longitude - 126.9).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_treated_as_one() {
        let resolver = CoordinateResolver::offline();
        let points = vec![Some(KatecPoint::new(263_722.2, 101_365.127))];
        let resolved = resolve_batch(&resolver, &points, 0, Duration::ZERO).await;
        assert_eq!(resolved.len(), 1);
    }
}
