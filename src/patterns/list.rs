use std::collections::HashMap;

use crate::patterns::{Pattern, PatternError};

/// Ordered child patterns of a composite, addressable by index or name.
///
/// Named children must be unique; anonymous children are allowed any number
/// of times.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
    index: HashMap<String, usize>,
}

impl PatternList {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `PatternError::DuplicateName` if a child with the same
    /// non-empty name exists.
    pub fn from_patterns(patterns: Vec<Pattern>) -> Result<Self, PatternError> {
        let mut list = Self::new();
        for pattern in patterns {
            list.push(pattern)?;
        }
        Ok(list)
    }

    /// Append a child.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::DuplicateName` if a child with the same
    /// non-empty name exists.
    pub fn push(&mut self, pattern: Pattern) -> Result<(), PatternError> {
        let name = pattern.name();
        if !name.is_empty() {
            if self.index.contains_key(name) {
                return Err(PatternError::DuplicateName(name.to_string()));
            }
            self.index.insert(name.to_string(), self.patterns.len());
        }
        self.patterns.push(pattern);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.index.get(name).and_then(|&i| self.patterns.get(i))
    }

    pub fn at(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Pattern> {
        self.patterns.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Pattern> {
        self.patterns.iter_mut()
    }

    pub(crate) fn as_slice(&self) -> &[Pattern] {
        &self.patterns
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Pattern] {
        &mut self.patterns
    }
}

impl<'a> IntoIterator for &'a PatternList {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}
