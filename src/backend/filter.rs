use serde_json::Value;

use crate::backend::Row;

/// Sort direction for the listing order modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone)]
enum Condition {
    Eq { column: String, value: Value },
    AnyOf { column: String, values: Vec<String> },
}

/// Row selection built from equality conditions, an optional id set and
/// an optional ordering. Conditions combine as a conjunction.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    conditions: Vec<Condition>,
    order: Option<(String, SortDirection)>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq { column: column.into(), value: value.into() });
        self
    }

    pub fn any_of(mut self, column: impl Into<String>, values: &[String]) -> Self {
        self.conditions.push(Condition::AnyOf { column: column.into(), values: values.to_vec() });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Render as PostgREST query parameters.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for condition in &self.conditions {
            match condition {
                Condition::Eq { column, value } => {
                    pairs.push((column.clone(), format!("eq.{}", literal(value))));
                }
                Condition::AnyOf { column, values } => {
                    let list = values
                        .iter()
                        .map(|v| format!("\"{}\"", v))
                        .collect::<Vec<_>>()
                        .join(",");
                    pairs.push((column.clone(), format!("in.({})", list)));
                }
            }
        }
        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
        }
        pairs
    }

    /// True when `row` satisfies every condition. Ordering is ignored here.
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq { column, value } => row.get(column).unwrap_or(&Value::Null) == value,
            Condition::AnyOf { column, values } => match row.get(column).and_then(Value::as_str) {
                Some(actual) => values.iter().any(|v| v == actual),
                None => false,
            },
        })
    }

    /// Apply the ordering, if any, to an in-memory result set.
    pub fn sort(&self, rows: &mut [Row]) {
        if let Some((column, direction)) = &self.order {
            rows.sort_by(|a, b| {
                let left = a.get(column).unwrap_or(&Value::Null);
                let right = b.get(column).unwrap_or(&Value::Null);
                let ordering = compare(left, right);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(left: &Value, right: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (left, right) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn renders_postgrest_query_pairs() {
        let filter = RowFilter::new()
            .eq("company_id", "C1")
            .eq("is_global", true)
            .order_by("published_at", SortDirection::Desc);
        let pairs = filter.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("company_id".to_string(), "eq.C1".to_string()),
                ("is_global".to_string(), "eq.true".to_string()),
                ("order".to_string(), "published_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn renders_id_set_as_quoted_in_list() {
        let ids = vec!["N1".to_string(), "N2".to_string()];
        let filter = RowFilter::new().any_of("notification_id", &ids);
        let pairs = filter.to_query_pairs();
        assert_eq!(pairs[0].1, "in.(\"N1\",\"N2\")");
    }

    #[test]
    fn matches_requires_every_condition() {
        let filter = RowFilter::new().eq("company_id", "C1").eq("is_global", false);
        assert!(filter.matches(&row(json!({ "company_id": "C1", "is_global": false }))));
        assert!(!filter.matches(&row(json!({ "company_id": "C1", "is_global": true }))));
        assert!(!filter.matches(&row(json!({ "company_id": "C2", "is_global": false }))));
    }

    #[test]
    fn missing_column_only_matches_null() {
        let filter = RowFilter::new().eq("department_id", "D1");
        assert!(!filter.matches(&row(json!({ "id": "U1" }))));
    }

    #[test]
    fn sorts_descending_by_timestamp_string() {
        let filter = RowFilter::new().order_by("published_at", SortDirection::Desc);
        let mut rows = vec![
            row(json!({ "id": "N1", "published_at": "2025-03-01T09:00:00Z" })),
            row(json!({ "id": "N3", "published_at": "2025-03-07T09:00:00Z" })),
            row(json!({ "id": "N2", "published_at": "2025-03-05T09:00:00Z" })),
        ];
        filter.sort(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["N3", "N2", "N1"]);
    }
}
