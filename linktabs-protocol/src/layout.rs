//! Round-robin assignment of link cards to columns.

/// Column an item at `index` lands in when laid out over `columns` columns.
///
/// A column count of zero is treated as one.
pub fn column_of(index: usize, columns: usize) -> usize {
    index % columns.max(1)
}

/// Distribute `items` over `columns` columns by [`column_of`], preserving
/// source order within each column.
///
/// Always returns exactly `max(columns, 1)` columns, some possibly empty.
pub fn distribute<T>(items: impl IntoIterator<Item = T>, columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    let mut out: Vec<Vec<T>> = (0..columns).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        out[column_of(index, columns)].push(item);
    }
    out
}
