//! Query operators
//!
//! Comparison and membership operators usable in a field condition.

/// Operators that can be applied to a field condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equals (=)
    Equals,
    /// Not equals (<>)
    NotEquals,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Set membership (In)
    In,
    /// Negated set membership (Not In)
    NotIn,
    /// Substring match (Contains)
    Contains,
    /// Path prefix match (Under)
    Under,
    /// Historical match across revisions (Ever)
    Ever,
}

impl Operator {
    /// Parse from the service's operator spelling
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Equals),
            "<>" => Some(Self::NotEquals),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            "In" => Some(Self::In),
            "Not In" => Some(Self::NotIn),
            "Contains" => Some(Self::Contains),
            "Under" => Some(Self::Under),
            "Ever" => Some(Self::Ever),
            _ => None,
        }
    }

    /// The exact spelling emitted into query text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::In => "In",
            Self::NotIn => "Not In",
            Self::Contains => "Contains",
            Self::Under => "Under",
            Self::Ever => "Ever",
        }
    }

    /// Membership operators take a parenthesized value list
    pub fn is_membership(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}
