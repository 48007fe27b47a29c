use std::iter::FusedIterator;
use std::slice;

/// Single-pass traversal of a slice in either direction.
///
/// Create a new one with [`directional`] to traverse again.
#[derive(Debug, Clone)]
pub struct Directional<'a, T> {
    inner: slice::Iter<'a, T>,
    reverse: bool,
}

/// Iterates `items` from the first element, or from the last when `reverse`
/// is set.
pub fn directional<T>(items: &[T], reverse: bool) -> Directional<'_, T> {
    Directional {
        inner: items.iter(),
        reverse,
    }
}

impl<'a, T> Iterator for Directional<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reverse {
            self.inner.next_back()
        } else {
            self.inner.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Directional<'_, T> {}

impl<T> FusedIterator for Directional<'_, T> {}
