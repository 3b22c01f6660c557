//! Ordered key/value container for [`Variant`].

use std::slice;

use super::Variant;

/// Pairs of variants kept sorted by key.
///
/// Iterating a map yields its values only, in key order. Keys are reached
/// through [`keys`](Map::keys) and [`entries`](Map::entries).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Map {
    entries: Vec<(Variant, Variant)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Inserts a pair, returning the value previously stored under an equal key.
    pub fn insert(&mut self, key: Variant, value: Variant) -> Option<Variant> {
        match self.search(&key) {
            Ok(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            Err(index) => {
                self.entries.insert(index, (key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Variant) -> Option<&Variant> {
        self.search(key).ok().map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, key: &Variant) -> Option<&mut Variant> {
        match self.search(key) {
            Ok(index) => Some(&mut self.entries[index].1),
            Err(_) => None,
        }
    }

    pub fn contains_key(&self, key: &Variant) -> bool {
        self.search(key).is_ok()
    }

    pub fn remove(&mut self, key: &Variant) -> Option<Variant> {
        let index = self.search(key).ok()?;
        Some(self.entries.remove(index).1)
    }

    /// Values in key order.
    pub fn iter(&self) -> Values<'_> {
        Values {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Variant> + ExactSizeIterator {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Key/value pairs in key order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (&Variant, &Variant)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn search(&self, key: &Variant) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }
}

impl FromIterator<(Variant, Variant)> for Map {
    fn from_iter<I: IntoIterator<Item = (Variant, Variant)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a Variant;
    type IntoIter = Values<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`Map`], in key order.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    inner: slice::Iter<'a, (Variant, Variant)>,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Variant;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Values<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl ExactSizeIterator for Values<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Map {
        Map::from_iter([
            (Variant::from("c"), Variant::from(2)),
            (Variant::from("a"), Variant::Null),
            (Variant::from("b"), Variant::from(true)),
        ])
    }

    #[test]
    fn iteration_yields_values_in_key_order() {
        let map = sample();
        let values: Vec<&Variant> = map.iter().collect();
        assert_eq!(values, vec![&Variant::Null, &Variant::from(true), &Variant::from(2)]);
    }

    #[test]
    fn keys_are_sorted() {
        let map = sample();
        let keys: Vec<_> = map.keys().filter_map(Variant::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_replaces_equal_key() {
        let mut map = sample();
        let old = map.insert(Variant::from("a"), Variant::from(1));
        assert_eq!(old, Some(Variant::Null));
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&Variant::from("a")), Some(&Variant::from(1)));
    }

    #[test]
    fn mixed_key_types() {
        let mut map = Map::new();
        map.insert(Variant::from("x"), Variant::from(1));
        map.insert(Variant::from(10), Variant::from(2));
        map.insert(Variant::Null, Variant::from(3));
        let values: Vec<_> = map.iter().filter_map(Variant::as_i64).collect();
        assert_eq!(values, vec![3, 2, 1]);
    }

    #[test]
    fn remove_and_contains() {
        let mut map = sample();
        assert!(map.contains_key(&Variant::from("b")));
        assert_eq!(map.remove(&Variant::from("b")), Some(Variant::from(true)));
        assert!(!map.contains_key(&Variant::from("b")));
        assert_eq!(map.remove(&Variant::from("b")), None);
    }
}
