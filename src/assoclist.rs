// Bare bones implementation of an association list. Record fields, variant
// fields and case branches are all small ordered maps where order matters for
// printing and for positional fields, so a Vec of pairs fits better than a
// std::collections::HashMap.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssocList<K: PartialEq, V: Clone> {
    pub inner: Vec<(K, V)>,
}

impl<K: Clone + PartialEq, V: Clone> AssocList<K, V> {
    pub fn from_vec(pairs: Vec<(K, V)>) -> AssocList<K, V> {
        AssocList { inner: pairs }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.inner.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.iter().map(|(key, _)| key)
    }

    /// First entry stored under `item`
    pub fn lookup(&self, item: &K) -> Option<&V> {
        self.inner
            .iter()
            .find(|(key, _)| key == item)
            .map(|(_, val)| val)
    }

    pub fn contains_key(&self, item: &K) -> bool {
        self.lookup(item).is_some()
    }

    pub fn map_val<T, F>(&self, mut func: F) -> AssocList<K, T>
    where
        T: Clone,
        F: FnMut(&V) -> T,
    {
        AssocList::from_vec(
            self.inner
                .iter()
                .map(|(key, val)| (key.clone(), func(val)))
                .collect(),
        )
    }

    pub fn try_map_val<T, E, F>(&self, mut func: F) -> Result<AssocList<K, T>, E>
    where
        T: Clone,
        F: FnMut(&V) -> Result<T, E>,
    {
        let result: Result<Vec<(K, T)>, E> = self
            .inner
            .iter()
            .map(|(key, val)| func(val).map(|res| (key.clone(), res)))
            .collect();
        result.map(AssocList::from_vec)
    }

    /// Copy of the list with the value at `index` replaced, every other
    /// entry carried over unchanged
    pub fn with_value_at(&self, index: usize, val: V) -> AssocList<K, V> {
        let mut fields = self.clone();
        if let Some(slot) = fields.inner.get_mut(index) {
            slot.1 = val;
        }
        fields
    }
}

/// Fields of records: a missing name marks a positional field, which answers
/// to its 1-based position
impl<V: Clone> AssocList<Option<String>, V> {
    pub fn labels(&self) -> impl Iterator<Item = (String, &V)> {
        self.inner.iter().enumerate().map(|(i, (key, val))| {
            let label = match key {
                Some(name) => name.clone(),
                None => (i + 1).to_string(),
            };
            (label, val)
        })
    }

    pub fn lookup_label(&self, label: &str) -> Option<&V> {
        self.labels()
            .find(|(key, _)| key == label)
            .map(|(_, val)| val)
    }
}
