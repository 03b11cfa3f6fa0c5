use indexmap::IndexMap;

/// A single result row of a query.
///
/// Columns keep the order in which the server returned them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    value: IndexMap<String, Option<String>>,
}

/// Index into a [Row](./struct.Row.html), by position or by column name.
pub trait Get {
    #[doc(hidden)]
    fn get<'r>(&self, row: &'r Row) -> Option<&'r Option<String>>;
}

impl Get for usize {
    fn get<'r>(&self, row: &'r Row) -> Option<&'r Option<String>> {
        row.value.get_index(*self).map(|(_, v)| v)
    }
}

impl Get for &str {
    fn get<'r>(&self, row: &'r Row) -> Option<&'r Option<String>> {
        row.value.get(*self)
    }
}

impl Row {
    #[inline]
    pub(crate) fn new() -> Self {
        Self { value: IndexMap::new() }
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: String, value: Option<String>) {
        self.value.insert(key, value);
    }

    /// Get the value of a column of the result row.
    /// SQL `NULL` and a missing column both yield `None`.
    #[inline]
    pub fn get<T: Get>(&self, key: T) -> Option<&str> {
        key.get(self)?.as_deref()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Option<V>)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k.into(), v.map(Into::into));
        }
        row
    }
}
