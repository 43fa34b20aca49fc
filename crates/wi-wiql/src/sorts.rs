//! Sort orders
//!
//! Ordering criteria for the `ORDER BY` clause of a query.

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    /// The exact spelling emitted into query text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A single ordering criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field reference name to order by
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    pub fn to_wiql(&self) -> String {
        format!("[{}] {}", self.field, self.direction.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_spelling() {
        assert_eq!(SortDirection::Asc.as_str(), "Asc");
        assert_eq!(SortDirection::Desc.as_str(), "Desc");
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(SortDirection::from_str("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::from_str("Descending"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_str("sideways"), None);
    }

    #[test]
    fn test_order_by_rendering() {
        assert_eq!(OrderBy::asc("System.Id").to_wiql(), "[System.Id] Asc");
        assert_eq!(
            OrderBy::desc("System.ChangedDate").to_wiql(),
            "[System.ChangedDate] Desc"
        );
    }

    #[test]
    fn test_reverse() {
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
    }
}
