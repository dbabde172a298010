use std::collections::HashSet;

use failure::Error;

/// Terminal coverage of a tree node.
///
/// Spans are non-empty, 1-based and end-exclusive. Indices between the
/// bounds that are not covered are recorded as skips.
///
/// Spans are derived from the terminals a node currently dominates, they
/// are never stored on nodes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    start: usize,
    end: usize,
    skips: Option<HashSet<usize>>,
}

impl From<usize> for Span {
    fn from(num: usize) -> Self {
        Span {
            start: num,
            end: num + 1,
            skips: None,
        }
    }
}

impl Span {
    /// Build a span from the covered terminal numbers.
    ///
    /// Duplicate numbers are collapsed. Returns an error if `coverage` is
    /// empty.
    pub fn from_vec(mut coverage: Vec<usize>) -> Result<Self, Error> {
        coverage.sort();
        let (lower, upper) = match (coverage.first(), coverage.last()) {
            (Some(first), Some(last)) => (*first, *last + 1),
            _ => return Err(format_err!("Can't build span from empty coverage")),
        };

        let mut skips = HashSet::new();
        let mut prev = upper;
        for num in coverage.into_iter().rev() {
            if prev != num + 1 {
                // duplicate entries end up here but add nothing since the
                // range (num + 1..prev) is empty
                skips.extend(num + 1..prev);
            }
            prev = num;
        }

        if skips.is_empty() {
            Ok(Span {
                start: lower,
                end: upper,
                skips: None,
            })
        } else {
            Ok(Span {
                start: lower,
                end: upper,
                skips: Some(skips),
            })
        }
    }

    /// Get the lowest covered index.
    pub fn lower(&self) -> usize {
        self.start
    }

    /// Get the exclusive upper bound of the span.
    pub fn upper(&self) -> usize {
        self.end
    }

    /// Get this span's bounds as a tuple.
    pub fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Return whether the span covers the index.
    pub fn contains(&self, index: usize) -> bool {
        if self.start <= index && self.end > index {
            self.skips
                .as_ref()
                .map(|skips| !skips.contains(&index))
                .unwrap_or(true)
        } else {
            false
        }
    }

    /// Get the number of indices covered.
    pub fn n_indices(&self) -> usize {
        if let Some(ref skips) = self.skips {
            self.end - self.start - skips.len()
        } else {
            self.end - self.start
        }
    }

    /// Return whether the span covers one unbroken run of indices.
    pub fn is_continuous(&self) -> bool {
        self.skips.is_none()
    }

    /// Get the skipped indices of this span.
    ///
    /// Returns `None` if the span is continuous.
    pub fn skips(&self) -> Option<&HashSet<usize>> {
        self.skips.as_ref()
    }
}
