//! Small ordered-set helpers for UI lists (recent searches, expanded rows).

#[must_use]
pub fn last<T>(items: &[T]) -> Option<&T> {
    items.last()
}

/// Copy of `items` without any element equal to `value`.
#[must_use]
pub fn remove<T: PartialEq + Clone>(items: &[T], value: &T) -> Vec<T> {
    items.iter().filter(|item| *item != value).cloned().collect()
}

/// Copy of `items` with `value` moved (or appended) to the end.
#[must_use]
pub fn add<T: PartialEq + Clone>(items: &[T], value: T) -> Vec<T> {
    let mut updated = remove(items, &value);
    updated.push(value);
    updated
}
