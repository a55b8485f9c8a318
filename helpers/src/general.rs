use std::error::Error;
use std::fmt;

/// InputValueError is used if some replay option or parameter does not fulfill the posed
/// requirements, e.g., by exceeding the recorded session duration.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that sort the array x (unstable sort).
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..x.len()).collect();

    match order {
        SortOrder::Ascending => idxs.sort_unstable_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap()),
        SortOrder::Descending => idxs.sort_unstable_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap()),
    };

    idxs
}

/// search_sorted returns the index of the first element in xp that is greater than x. xp must be
/// sorted ascending. The result is in the range [0, xp.len()], i.e. 0 if x precedes all elements
/// and xp.len() if x is at or past the last element (O(log n), inspired by numpy.searchsorted).
pub fn search_sorted(x: f64, xp: &[f64]) -> usize {
    let mut lo = 0;
    let mut hi = xp.len();

    while lo < hi {
        let mid = (lo + hi) / 2;
        if xp[mid] <= x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    lo
}

/// fmt_racetime formats a race time given in seconds as m:ss.mmm (or s.mmm below one minute).
pub fn fmt_racetime(seconds: f64) -> String {
    if !seconds.is_finite() {
        return String::from("—");
    }

    let m = (seconds / 60.0).trunc() as u32;
    let s = seconds % 60.0;

    if m > 0 {
        format!("{}:{:06.3}", m, s)
    } else {
        format!("{:.3}", s)
    }
}
