use crate::utils::validation::{validate_length_bounds, ValidationError};

/// Resumable length enumeration for variable-length patterns.
///
/// Every call to [`LengthCursor::next_length`] yields the next length in
/// `[min, max]`, stepping by a possibly fractional amount. The increment is
/// 0 while lengths remain and becomes 1 on the call that reaches `max`, at
/// which point the cursor wraps back to `min`.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthCursor {
    min: usize,
    max: usize,
    step: f64,
    length: f64,
    increment: usize,
}

impl LengthCursor {
    /// # Errors
    ///
    /// Returns `ValidationError` if `max < min` or `step` is not positive.
    pub fn new(min: usize, max: usize, step: f64) -> Result<Self, ValidationError> {
        validate_length_bounds(min, max, step)?;
        Ok(Self {
            min,
            max,
            step,
            length: min as f64,
            increment: 1,
        })
    }

    /// Cursor that always yields the same length
    pub fn fixed(length: usize) -> Self {
        Self {
            min: length,
            max: length,
            step: 1.0,
            length: length as f64,
            increment: 1,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// `max - min`
    pub fn flexibility(&self) -> usize {
        self.max - self.min
    }

    /// 0 while the current enumeration has lengths left, 1 once it wrapped
    pub fn increment(&self) -> usize {
        self.increment
    }

    pub fn next_length(&mut self) -> usize {
        let current = (self.length + 0.5) as usize;
        self.length += self.step;
        if current >= self.max {
            self.increment = 1;
            self.length = self.min as f64;
        } else {
            self.increment = 0;
        }
        current.min(self.max)
    }

    /// Lengths `min, min + step, ...` up to `max` without touching the cursor
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        let mut length = self.min as f64;
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let current = (length + 0.5) as usize;
            length += self.step;
            if current >= self.max {
                done = true;
            }
            Some(current.min(self.max))
        })
    }

    pub fn reset(&mut self) {
        self.length = self.min as f64;
        self.increment = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_step() {
        let mut cursor = LengthCursor::new(1, 7, 1.7).unwrap();
        let mut lengths = Vec::new();
        let mut increments = Vec::new();
        for _ in 0..5 {
            lengths.push(cursor.next_length());
            increments.push(cursor.increment());
        }
        assert_eq!(lengths, vec![1, 3, 4, 6, 7]);
        assert_eq!(increments, vec![0, 0, 0, 0, 1]);
        // wrapped
        assert_eq!(cursor.next_length(), 1);
    }

    #[test]
    fn test_lengths_preview_matches_cursor() {
        let cursor = LengthCursor::new(1, 7, 1.7).unwrap();
        assert_eq!(cursor.lengths().collect::<Vec<_>>(), vec![1, 3, 4, 6, 7]);
        assert_eq!(LengthCursor::fixed(3).lengths().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_fixed_length_always_wraps() {
        let mut cursor = LengthCursor::fixed(4);
        assert_eq!(cursor.next_length(), 4);
        assert_eq!(cursor.increment(), 1);
        assert_eq!(cursor.next_length(), 4);
        assert_eq!(cursor.flexibility(), 0);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(LengthCursor::new(5, 3, 1.0).is_err());
        assert!(LengthCursor::new(1, 3, 0.0).is_err());
        assert!(LengthCursor::new(1, 3, -1.0).is_err());
    }
}
