mod memory;

pub use memory::Store;

/// Scalar a field lookup yields. Ordered so rows can be sorted by any field;
/// a given field always answers with the same variant, so cross-variant
/// ordering never matters in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u64> for FieldValue {
    // Ids past i64::MAX clamp to the cap instead of wrapping negative.
    fn from(value: u64) -> Self {
        FieldValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Row type a [`Store`] can keep: a stable name for diagnostics, the set of
/// queryable field names, and access to the id the store assigns.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in log lines and error messages.
    const NAME: &'static str;

    /// Field names [`Entity::field`] answers for. Lookups and ordering are
    /// validated against this list before any row is touched.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: u64);

    /// Value of the named field on this row, or None when the field is
    /// currently unset (an unsaved id, a missing reference).
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_order_within_their_variant() {
        assert!(FieldValue::Int(2) < FieldValue::Int(10));
        assert!(FieldValue::from("alice") < FieldValue::from("bob"));
        assert_eq!(FieldValue::from(7u64), FieldValue::Int(7));
        assert_eq!(FieldValue::from("x".to_string()), FieldValue::from("x"));
    }

    #[test]
    fn huge_ids_clamp_instead_of_wrapping() {
        assert_eq!(FieldValue::from(u64::MAX), FieldValue::Int(i64::MAX));
        assert!(FieldValue::from(u64::MAX) > FieldValue::Int(0));
        assert!(FieldValue::from(u64::MAX) > FieldValue::from(1u64));
    }
}
