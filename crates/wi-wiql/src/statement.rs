//! Query statement assembly
//!
//! Combines column selection, a condition tree, ordering, and an optional
//! as-of timestamp into the full textual query:
//! `SELECT … FROM WorkItems [WHERE …] [ORDER BY …] [AsOf '…']`.

use chrono::{DateTime, SecondsFormat, Utc};

use wi_core::fields;

use crate::condition::Condition;
use crate::sorts::{OrderBy, SortDirection};

/// Builder for a complete query statement
#[derive(Debug, Clone, Default)]
pub struct WiqlStatement {
    fields: Vec<String>,
    condition: Condition,
    order_by: Vec<OrderBy>,
    as_of: Option<DateTime<Utc>>,
}

impl WiqlStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the SELECT list
    pub fn select(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add several fields to the SELECT list
    pub fn select_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Set the WHERE condition
    pub fn filter(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Add an ordering criterion
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy::new(field, direction));
        self
    }

    /// Evaluate the query against a historical point in time
    pub fn as_of(mut self, timestamp: DateTime<Utc>) -> Self {
        self.as_of = Some(timestamp);
        self
    }

    /// Serialize the statement into query text.
    pub fn to_wiql(&self) -> String {
        let select = if self.fields.is_empty() {
            // The identity field is always a valid default selection.
            format!("[{}]", fields::ID)
        } else {
            self.fields
                .iter()
                .map(|f| format!("[{f}]"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut text = format!("SELECT {select} FROM WorkItems");

        let condition = self.condition.to_wiql();
        if !condition.is_empty() {
            text.push_str(" WHERE ");
            text.push_str(&condition);
        }

        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(OrderBy::to_wiql)
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(" ORDER BY ");
            text.push_str(&order);
        }

        if let Some(timestamp) = self.as_of {
            text.push_str(&format!(
                " AsOf '{}'",
                timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            ));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::Operator;
    use chrono::TimeZone;

    #[test]
    fn test_empty_statement_selects_id() {
        let statement = WiqlStatement::new();
        assert_eq!(statement.to_wiql(), "SELECT [System.Id] FROM WorkItems");
    }

    #[test]
    fn test_selected_fields_rendered_bracketed() {
        let statement = WiqlStatement::new()
            .select("System.Id")
            .select("System.Title");
        assert_eq!(
            statement.to_wiql(),
            "SELECT [System.Id], [System.Title] FROM WorkItems"
        );
    }

    #[test]
    fn test_where_clause_appended() {
        let statement = WiqlStatement::new()
            .select("System.Id")
            .filter(Condition::field("System.State", Operator::Equals, "Active"));
        assert_eq!(
            statement.to_wiql(),
            "SELECT [System.Id] FROM WorkItems WHERE [System.State] = 'Active'"
        );
    }

    #[test]
    fn test_empty_condition_omits_where() {
        let statement = WiqlStatement::new()
            .select("System.Id")
            .filter(Condition::and(vec![Condition::Empty]));
        assert_eq!(statement.to_wiql(), "SELECT [System.Id] FROM WorkItems");
    }

    #[test]
    fn test_order_by_clause() {
        let statement = WiqlStatement::new()
            .select("System.Id")
            .order_by("System.ChangedDate", SortDirection::Desc)
            .order_by("System.Id", SortDirection::Asc);
        assert_eq!(
            statement.to_wiql(),
            "SELECT [System.Id] FROM WorkItems ORDER BY [System.ChangedDate] Desc, [System.Id] Asc"
        );
    }

    #[test]
    fn test_as_of_clause() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let statement = WiqlStatement::new().select("System.Id").as_of(timestamp);
        assert_eq!(
            statement.to_wiql(),
            "SELECT [System.Id] FROM WorkItems AsOf '2024-03-01T12:30:00.000Z'"
        );
    }

    #[test]
    fn test_full_statement_clause_order() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let statement = WiqlStatement::new()
            .select_fields(["System.Id", "System.State"])
            .filter(Condition::and(vec![
                Condition::field("System.State", Operator::Equals, "Active"),
                Condition::field("System.AssignedTo", Operator::Equals, "@Me"),
            ]))
            .order_by("System.Id", SortDirection::Asc)
            .as_of(timestamp);
        assert_eq!(
            statement.to_wiql(),
            "SELECT [System.Id], [System.State] FROM WorkItems \
             WHERE ([System.State] = 'Active' AND [System.AssignedTo] = @Me) \
             ORDER BY [System.Id] Asc AsOf '2024-03-01T00:00:00.000Z'"
        );
    }
}
