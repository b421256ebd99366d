use std::cmp::Ordering;
use std::thread::available_parallelism;

use eyre::{Result, WrapErr};

fn _normalize(requested: isize, max: isize) -> usize {
    match requested.cmp(&0) {
        Ordering::Less => (max + requested + 1).max(1) as usize,
        Ordering::Equal => 1,
        Ordering::Greater => requested.min(max) as usize,
    }
}

/// Number of worker threads to use for the requested amount, capped by the machine.
/// Negative requests are counted from the number of available cores: -1 => all cores, -2 => all
/// but one, and so on. Zero is treated as a single thread.
pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()
        .wrap_err("Failed to query the number of available cores")?
        .get() as isize;
    Ok(_normalize(requested, max))
}
