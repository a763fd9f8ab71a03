use std::collections::HashSet;
use std::hash::Hash;

use uuid::Uuid;

use crate::api::error;

pub fn parse_uuid(raw: &str) -> Result<Uuid, error::SystemError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        error::SystemError::invalid_identifier(format!("\"{raw}\" is not a valid identifier"))
    })
}

/// Orders a pair so that `(a, b)` and `(b, a)` produce the same key.
pub fn ordered_pair<T: Ord + Copy>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Drops repeated values, keeping the first occurrence of each.
pub fn dedup_stable<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        let err = parse_uuid("abc").unwrap_err();
        assert!(matches!(err, error::SystemError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_parse_uuid_accepts_padded_input() {
        let id = Uuid::now_v7();
        assert_eq!(parse_uuid(&format!(" {id} ")).unwrap(), id);
    }

    #[test]
    fn test_ordered_pair_is_symmetric() {
        assert_eq!(ordered_pair(3, 1), ordered_pair(1, 3));
    }

    #[test]
    fn test_dedup_stable_keeps_first_seen_order() {
        assert_eq!(dedup_stable([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
