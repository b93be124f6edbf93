//! Natural path ordering.
//!
//! Migration application order is the ascending natural order of the
//! full file path: runs of digits compare by numeric value, everything
//! else compares lexicographically, so `V2` sorts before `V10`. This is
//! the single source of truth for apply sequence and is computed once
//! per run, before any classification-based filtering.

use std::cmp::Ordering;

/// Compare two strings using natural ordering.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_rest = a;
    let mut b_rest = b;

    loop {
        match (a_rest.is_empty(), b_rest.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let a_digit = a_rest.starts_with(|c: char| c.is_ascii_digit());
        let b_digit = b_rest.starts_with(|c: char| c.is_ascii_digit());

        match (a_digit, b_digit) {
            (true, true) => {
                let (a_run, a_tail) = split_digit_run(a_rest);
                let (b_run, b_tail) = split_digit_run(b_rest);
                match compare_digit_runs(a_run, b_run) {
                    Ordering::Equal => {
                        a_rest = a_tail;
                        b_rest = b_tail;
                    }
                    unequal => return unequal,
                }
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {
                let a_char = a_rest.chars().next().expect("non-empty");
                let b_char = b_rest.chars().next().expect("non-empty");
                match a_char.cmp(&b_char) {
                    Ordering::Equal => {
                        a_rest = &a_rest[a_char.len_utf8()..];
                        b_rest = &b_rest[b_char.len_utf8()..];
                    }
                    unequal => return unequal,
                }
            }
        }
    }
}

/// Split a leading run of ASCII digits off a string.
fn split_digit_run(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Compare two digit runs by numeric value without overflowing:
/// strip leading zeros, then longer run wins, then lexicographic.
/// Equal values with different zero-padding tie-break on run length.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_stripped = a.trim_start_matches('0');
    let b_stripped = b.trim_start_matches('0');
    a_stripped
        .len()
        .cmp(&b_stripped.len())
        .then_with(|| a_stripped.cmp(b_stripped))
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
