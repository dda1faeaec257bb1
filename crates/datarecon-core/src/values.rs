use std::cmp::Ordering;
use std::fmt;

/// A single cell as loaded from a snapshot.
///
/// Values keep the tag they were loaded with: two cells are equal only when
/// both the tag and the payload match. A numeric `2` and the string `"2"`
/// compare as different, which surfaces cross-type drift between the two
/// sides instead of hiding it behind stringification.
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Number(f64),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b) == Ordering::Equal,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Total order used by the mismatch scanner's key sort.
///
/// Nulls sort first, numbers next (by `total_cmp`), strings last. The order
/// only has to be total and identical on both sides; it carries no semantic
/// meaning beyond aligning the two sorted tables.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Number(_), Value::Str(_)) => Ordering::Less,
            (Value::Str(_), Value::Number(_)) => Ordering::Greater,
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_tag_and_value() {
        assert_eq!(Value::Str("2".to_string()), Value::Str("2".to_string()));
        assert_eq!(Value::Number(2.0), Value::Number(2.0));
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Number(2.0), Value::Str("2".to_string()));
        assert_ne!(Value::Null, Value::Str(String::new()));
        assert_ne!(Value::Number(2.0), Value::Number(2.5));
    }

    #[test]
    fn test_ordering_is_total() {
        let mut values = vec![
            Value::Str("b".to_string()),
            Value::Number(10.0),
            Value::Null,
            Value::Str("a".to_string()),
            Value::Number(2.0),
        ];
        values.sort();
        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Number(2.0));
        assert_eq!(values[2], Value::Number(10.0));
        assert_eq!(values[3], Value::Str("a".to_string()));
        assert_eq!(values[4], Value::Str("b".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Str("abc".to_string()).to_string(), "abc");
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
