//! Slice scheduler (component G): partitions a frame into horizontal
//! slices and runs a per-slice closure across the host's thread pool.
//!
//! Slices are independent — no inter-slice communication — except for the
//! Floyd-Steinberg dithered path, which the pipeline forces to a single
//! slice since error diffusion does not cross slice boundaries (spec
//! 4.5/9: an accepted artefact, not a bug).

use rayon::prelude::*;

/// Computes slice row ranges covering `[0, height)`. Each slice covers an
/// even number of luma rows (so 4:2:0 chroma subsampling stays aligned),
/// except possibly the final slice if `height` is itself odd — callers in
/// this crate reject odd `height` before reaching the scheduler (spec
/// `InvalidDimensions`), so in practice every slice divides evenly.
///
/// Slice count is `min((height+1)/2, worker_count)`, per spec 4.7, clamped
/// to 1 when `force_single` is set (the dithered path).
pub fn slice_ranges(height: usize, worker_count: usize, force_single: bool) -> Vec<(usize, usize)> {
    if height == 0 {
        return Vec::new();
    }
    let max_slices = (height + 1) / 2;
    let n = if force_single {
        1
    } else {
        max_slices.min(worker_count.max(1))
    };

    let mut ranges = Vec::with_capacity(n);
    // Rows per slice, rounded up to an even number so every slice boundary
    // (but the last) lands on a 2-row-aligned luma offset.
    let mut rows_per_slice = (height + n - 1) / n;
    if rows_per_slice % 2 != 0 {
        rows_per_slice += 1;
    }
    let mut start = 0;
    while start < height {
        let end = (start + rows_per_slice).min(height);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Runs `f(row_start, row_end)` once per slice, in parallel across the
/// host's rayon thread pool (or a single slice when `force_single`, e.g.
/// the dithered path — see [`slice_ranges`]).
pub fn dispatch<F>(height: usize, worker_count: usize, force_single: bool, f: F)
where
    F: Fn(usize, usize) + Sync,
{
    let ranges = slice_ranges(height, worker_count, force_single);
    ranges.into_par_iter().for_each(|(start, end)| f(start, end));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_cover_full_height_with_no_gaps() {
        let ranges = slice_ranges(96, 4, false);
        assert_eq!(ranges.first().unwrap().0, 0);
        assert_eq!(ranges.last().unwrap().1, 96);
        for w in ranges.windows(2) {
            assert_eq!(w[0].1, w[1].0);
        }
    }

    #[test]
    fn slice_boundaries_stay_even() {
        let ranges = slice_ranges(96, 5, false);
        for (start, end) in &ranges[..ranges.len() - 1] {
            assert_eq!(start % 2, 0);
            assert_eq!(end % 2, 0);
        }
    }

    #[test]
    fn force_single_yields_one_slice() {
        let ranges = slice_ranges(96, 8, true);
        assert_eq!(ranges, vec![(0, 96)]);
    }

    #[test]
    fn slice_count_never_exceeds_worker_count() {
        let ranges = slice_ranges(96, 3, false);
        assert!(ranges.len() <= 3);
    }

    #[test]
    fn dispatch_visits_every_row_exactly_once() {
        use std::sync::Mutex;
        let seen = Mutex::new(vec![false; 96]);
        dispatch(96, 4, false, |start, end| {
            let mut seen = seen.lock().unwrap();
            for row in start..end {
                assert!(!seen[row], "row {row} visited twice");
                seen[row] = true;
            }
        });
        assert!(seen.into_inner().unwrap().into_iter().all(|v| v));
    }
}
