//! Stable ordering of records by a numeric field.

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort `records` by the numeric key returned from `key`.
///
/// Records with equal keys keep their relative order in both directions.
pub fn sort_by_field<T, F>(records: &mut [T], direction: Direction, key: F)
where
    F: Fn(&T) -> i64,
{
    match direction {
        Direction::Asc => records.sort_by_key(|r| key(r)),
        Direction::Desc => records.sort_by(|a, b| key(b).cmp(&key(a))),
    }
}
