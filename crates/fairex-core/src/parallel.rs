//! Per-chunk map, on the rayon pool when the `parallel` feature is enabled.
//!
//! Every per-chunk step (derive key, crypt, hash) depends only on the index
//! and its own chunk, so the map needs no synchronization. Results come back
//! in index order either way.

/// Apply `f` to every `(index, item)` pair, keeping index order.
#[cfg(feature = "parallel")]
pub fn map_indexed<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync + Send,
{
    use rayon::prelude::*;
    items.par_iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

/// Apply `f` to every `(index, item)` pair, keeping index order.
#[cfg(not(feature = "parallel"))]
pub fn map_indexed<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync + Send,
{
    items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

/// Fallible form of [`map_indexed`]; returns the error of the lowest failing index.
pub fn try_map_indexed<T, R, E, F>(items: &[T], f: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<R, E> + Sync + Send,
{
    map_indexed(items, f).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let items: Vec<u32> = (0..100).collect();
        let out = map_indexed(&items, |i, v| (i as u32) * 10 + v);
        assert_eq!(out[7], 77);
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn test_first_error_wins() {
        let items = vec![1, 2, 3, 4];
        let out: Result<Vec<i32>, usize> =
            try_map_indexed(&items, |i, v| if *v >= 3 { Err(i) } else { Ok(*v) });
        assert_eq!(out.unwrap_err(), 2);
    }
}
