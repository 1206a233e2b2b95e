/// Compound and invertible comparators.
pub mod comparator;
/// Insertion ordered map with many values per key.
pub mod multi_value;

/// Utility for creating mock trait implementations.
#[cfg(test)]
pub mod mock;
