//! Distance capability used to key and prune the tree.

/// Integer distance between two items.
///
/// The tree never validates these properties, but query completeness depends
/// on them:
/// - Identity:  `distance(a, a) == 0`
/// - Symmetry:  `distance(a, b) == distance(b, a)`
/// - Triangle:  `distance(a, c) <= distance(a, b) + distance(b, c)`
///
/// A metric that breaks them does not make the tree panic or error; `find`
/// may simply miss items that are within the radius.
///
/// Any `Fn(&[u8], &[u8]) -> u64` is a metric:
///
/// ```rust
/// use bktree::Metric;
///
/// let len_diff = |a: &[u8], b: &[u8]| a.len().abs_diff(b.len()) as u64;
/// assert_eq!(len_diff.distance(b"abc", b"a"), 2);
/// ```
pub trait Metric {
    fn distance(&self, a: &[u8], b: &[u8]) -> u64;
}

impl<F> Metric for F
where
    F: Fn(&[u8], &[u8]) -> u64,
{
    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> u64 {
        self(a, b)
    }
}
