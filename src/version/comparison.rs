//! Segment-wise version comparison.
//!
//! Metadata files carry free-form version strings (`1.2.3`, `2.0rc1`,
//! `1.0-beta`), so comparison cannot rely on semantic versioning. Instead both
//! strings are cut into alternating runs of digits and letters, separators are
//! skipped, and the runs are compared pairwise in lock-step.
//!
//! # Segment Rules
//!
//! - **Numeric vs numeric**: leading zeros are ignored, the run with more
//!   digits is newer, equal lengths compare digit by digit.
//! - **Alphabetic vs alphabetic**: byte-wise lexicographic comparison.
//! - **Mismatched or missing segments**: ranked alphabetic < absent < numeric,
//!   so `1.0a` is older than `1.0`, which is older than `1.0.1`.
//! - **Trailing separators**: when only separators remain, the string that
//!   still has characters left is newer.
//!
//! # Examples
//!
//! ```rust
//! use pkgmeta_cli::version::compare;
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare("1.0", "1.0"), Ordering::Equal);
//! assert_eq!(compare("1.0", "2.0"), Ordering::Less);
//! assert_eq!(compare("1.0.0", "1.0"), Ordering::Greater);
//! assert_eq!(compare("1.10", "1.9"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// One run of a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Numeric(&'a [u8]),
    Alpha(&'a [u8]),
    End,
}

impl Segment<'_> {
    /// Ordering used when the two sides disagree on the segment type.
    const fn rank(self) -> u8 {
        match self {
            Segment::Alpha(_) => 0,
            Segment::End => 1,
            Segment::Numeric(_) => 2,
        }
    }
}

/// Skip separators, then split off the next digit or letter run.
fn next_segment(input: &[u8]) -> (Segment<'_>, &[u8]) {
    let start = input.iter().position(u8::is_ascii_alphanumeric).unwrap_or(input.len());
    let input = &input[start..];

    match input.first() {
        None => (Segment::End, input),
        Some(c) if c.is_ascii_digit() => {
            let len = input.iter().take_while(|c| c.is_ascii_digit()).count();
            (Segment::Numeric(&input[..len]), &input[len..])
        }
        Some(_) => {
            let len = input.iter().take_while(|c| c.is_ascii_alphabetic()).count();
            (Segment::Alpha(&input[..len]), &input[len..])
        }
    }
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = &a[a.iter().take_while(|&&c| c == b'0').count()..];
    let b = &b[b.iter().take_while(|&&c| c == b'0').count()..];

    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two version strings.
///
/// Returns [`Ordering::Less`] when `a` is older than `b`, [`Ordering::Greater`]
/// when it is newer. The comparison is antisymmetric for every input pair:
/// `compare(a, b) == compare(b, a).reverse()`.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let mut one = a.as_bytes();
    let mut two = b.as_bytes();

    loop {
        if one.is_empty() && two.is_empty() {
            return Ordering::Equal;
        }

        let (seg_one, rest_one) = next_segment(one);
        let (seg_two, rest_two) = next_segment(two);

        let result = match (seg_one, seg_two) {
            (Segment::End, Segment::End) => {
                // Only separators remain on whichever side still has input.
                return match (one.is_empty(), two.is_empty()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                };
            }
            (Segment::Numeric(x), Segment::Numeric(y)) => compare_numeric(x, y),
            (Segment::Alpha(x), Segment::Alpha(y)) => x.cmp(y),
            (x, y) => x.rank().cmp(&y.rank()),
        };

        if result != Ordering::Equal {
            return result;
        }

        one = rest_one;
        two = rest_two;
    }
}
