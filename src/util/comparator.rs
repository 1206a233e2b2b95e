use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use thiserror::Error;

/// Errors raised by a misconfigured comparator chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComparatorError {
    /// The chain was used before any comparator was added.
    #[error("No sort definitions have been added to this CompoundComparator to compare")]
    Empty,
    /// A comparator index does not exist in the chain.
    #[error("Comparator index {index} is out of range for a chain of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A comparison rule with a direction. Descending order reverses the result of the rule.
pub struct InvertibleComparator<T> {
    comparator: CompareFn<T>,
    ascending: bool,
}

impl<T> InvertibleComparator<T> {
    /// Creates an ascending comparator.
    pub fn new(comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> InvertibleComparator<T> {
        InvertibleComparator::with_order(comparator, true)
    }

    /// Creates a comparator with the given direction.
    pub fn with_order(comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static, ascending: bool) -> InvertibleComparator<T> {
        InvertibleComparator { comparator: Arc::new(comparator), ascending }
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    pub fn set_ascending(&mut self, ascending: bool) {
        self.ascending = ascending
    }

    /// Flips the direction of this comparator.
    pub fn invert_order(&mut self) {
        self.ascending = !self.ascending
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let result = (self.comparator)(a, b);
        if self.ascending { result } else { result.reverse() }
    }
}

impl<T> Clone for InvertibleComparator<T> {
    fn clone(&self) -> Self {
        InvertibleComparator { comparator: Arc::clone(&self.comparator), ascending: self.ascending }
    }
}

impl<T> Debug for InvertibleComparator<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InvertibleComparator {{ ascending: {} }}", self.ascending)
    }
}

/// A chain of comparators applied in order. The first comparator that does not find the two values
/// equal decides the ordering. If every comparator finds them equal then they are equal.
///
/// ```
/// use reqview::util::comparator::CompoundComparator;
///
/// let mut chain = CompoundComparator::<(u32, char)>::new();
/// chain.add_comparator_with_order(|a, b| a.0.cmp(&b.0), false);
/// chain.add_comparator(|a, b| a.1.cmp(&b.1));
///
/// let mut values = vec![(1, 'b'), (2, 'z'), (1, 'a')];
/// chain.sort(&mut values).unwrap();
/// assert_eq!(values, vec![(2, 'z'), (1, 'a'), (1, 'b')]);
/// ```
pub struct CompoundComparator<T> {
    comparators: Vec<InvertibleComparator<T>>,
}

impl<T> Default for CompoundComparator<T> {
    fn default() -> Self {
        CompoundComparator { comparators: Vec::new() }
    }
}

impl<T> CompoundComparator<T> {
    /// Creates an empty chain. At least one comparator must be added before comparing.
    pub fn new() -> CompoundComparator<T> {
        CompoundComparator::default()
    }

    /// Creates a chain from comparators that keep their own direction.
    pub fn from_comparators(comparators: Vec<InvertibleComparator<T>>) -> CompoundComparator<T> {
        CompoundComparator { comparators }
    }

    /// Adds an ascending comparator to the end of the chain.
    pub fn add_comparator(&mut self, comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) {
        self.comparators.push(InvertibleComparator::new(comparator))
    }

    /// Adds a comparator to the end of the chain with the given direction.
    pub fn add_comparator_with_order(&mut self, comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static, ascending: bool) {
        self.comparators.push(InvertibleComparator::with_order(comparator, ascending))
    }

    /// Adds a comparator to the end of the chain, keeping the direction it already has.
    pub fn add_invertible(&mut self, comparator: InvertibleComparator<T>) {
        self.comparators.push(comparator)
    }

    /// Replaces the comparator at the given index, keeping the direction the new comparator has.
    pub fn set_comparator(&mut self, index: usize, comparator: InvertibleComparator<T>) -> Result<(), ComparatorError> {
        *self.comparator_mut(index)? = comparator;
        Ok(())
    }

    /// Flips the direction of every comparator in the chain.
    pub fn invert_order(&mut self) {
        self.comparators.iter_mut().for_each(InvertibleComparator::invert_order)
    }

    /// Flips the direction of the comparator at the given index.
    pub fn invert_order_at(&mut self, index: usize) -> Result<(), ComparatorError> {
        self.comparator_mut(index)?.invert_order();
        Ok(())
    }

    pub fn set_ascending_order(&mut self, index: usize) -> Result<(), ComparatorError> {
        self.comparator_mut(index)?.set_ascending(true);
        Ok(())
    }

    pub fn set_descending_order(&mut self, index: usize) -> Result<(), ComparatorError> {
        self.comparator_mut(index)?.set_ascending(false);
        Ok(())
    }

    /// The number of comparators in the chain.
    pub fn comparator_count(&self) -> usize {
        self.comparators.len()
    }

    /// Compares two values with the chain.
    pub fn compare(&self, a: &T, b: &T) -> Result<Ordering, ComparatorError> {
        if self.comparators.is_empty() {
            return Err(ComparatorError::Empty);
        }
        Ok(self.compare_unchecked(a, b))
    }

    /// Stable sorts the given values with the chain.
    pub fn sort(&self, values: &mut [T]) -> Result<(), ComparatorError> {
        if self.comparators.is_empty() {
            return Err(ComparatorError::Empty);
        }
        values.sort_by(|a, b| self.compare_unchecked(a, b));
        Ok(())
    }

    fn compare_unchecked(&self, a: &T, b: &T) -> Ordering {
        self.comparators.iter()
            .map(|comparator| comparator.compare(a, b))
            .find(|result| *result != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    fn comparator_mut(&mut self, index: usize) -> Result<&mut InvertibleComparator<T>, ComparatorError> {
        let len = self.comparators.len();
        self.comparators.get_mut(index).ok_or(ComparatorError::IndexOutOfRange { index, len })
    }
}

impl<T> Clone for CompoundComparator<T> {
    fn clone(&self) -> Self {
        CompoundComparator { comparators: self.comparators.clone() }
    }
}

impl<T> Debug for CompoundComparator<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompoundComparator: {:?}", self.comparators)
    }
}
