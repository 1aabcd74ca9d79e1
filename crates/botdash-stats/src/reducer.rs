//! Fold abstraction shared by all reducers.

/// A pure fold over a collection.
///
/// Given the same items and the same auxiliary inputs, `reduce` returns the
/// same output on every call.
pub trait Reducer {
    type Item;
    type Output;

    /// Value for an empty collection.
    fn zero(&self) -> Self::Output;

    /// Fold one element into the accumulator.
    fn step(&self, acc: Self::Output, item: &Self::Item) -> Self::Output;

    /// Fold a whole collection, in iteration order.
    fn reduce<'a, I>(&self, items: I) -> Self::Output
    where
        I: IntoIterator<Item = &'a Self::Item>,
        Self::Item: 'a,
    {
        items
            .into_iter()
            .fold(self.zero(), |acc, item| self.step(acc, item))
    }
}
