//! Pagination and filtering model shared by every paginated list.
//!
//! A [`PaginationRequest`] arrives from the client and is validated against a
//! per-entity column allow-list into a [`PageQuery`], which the store layer
//! turns into SQL (PostgreSQL) or evaluates directly (in-memory stores).
//! Column names never reach SQL unless they came from the allow-list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::messages::common;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Column allow-lists
// ---------------------------------------------------------------------------

/// Value type of a filterable column; decides which operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Boolean,
    Date,
}

/// One filterable column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Text }
    }

    pub const fn number(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Number }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Boolean }
    }

    pub const fn date(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Date }
    }
}

/// Look up `column` in an allow-list.
pub fn find_column(columns: &[ColumnSpec], column: &str) -> CoreResult<ColumnSpec> {
    columns
        .iter()
        .find(|c| c.name == column)
        .copied()
        .ok_or_else(|| CoreError::validation(format!("{}{column}", common::INVALID_COLUMN_PREFIX)))
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Filter operators. Number operators also accept their symbol spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Contains,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    IsOneOf,
    IsNotOneOf,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Is,
    IsNot,
    IsAfter,
    IsOnOrAfter,
    IsBefore,
    IsOnOrBefore,
}

impl Operator {
    pub fn parse(raw: &str) -> Option<Self> {
        let op = match raw.trim() {
            "contains" => Self::Contains,
            "equals" | "=" | "==" => Self::Equals,
            "notEquals" | "!=" | "<>" => Self::NotEquals,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "isEmpty" => Self::IsEmpty,
            "isNotEmpty" => Self::IsNotEmpty,
            "isOneOf" | "isAnyOf" => Self::IsOneOf,
            "isNotOneOf" => Self::IsNotOneOf,
            "greaterThan" | ">" => Self::GreaterThan,
            "greaterThanOrEqual" | ">=" => Self::GreaterThanOrEqual,
            "lessThan" | "<" => Self::LessThan,
            "lessThanOrEqual" | "<=" => Self::LessThanOrEqual,
            "is" => Self::Is,
            "isNot" => Self::IsNot,
            "isAfter" => Self::IsAfter,
            "isOnOrAfter" => Self::IsOnOrAfter,
            "isBefore" => Self::IsBefore,
            "isOnOrBefore" => Self::IsOnOrBefore,
            _ => return None,
        };
        Some(op)
    }

    /// Whether the operator is meaningful for a column of `kind`.
    pub fn supports(self, kind: ColumnKind) -> bool {
        use Operator::*;
        match kind {
            ColumnKind::Text => matches!(
                self,
                Contains
                    | Equals
                    | NotEquals
                    | StartsWith
                    | EndsWith
                    | IsEmpty
                    | IsNotEmpty
                    | IsOneOf
                    | IsNotOneOf
            ),
            ColumnKind::Number => matches!(
                self,
                Equals
                    | NotEquals
                    | GreaterThan
                    | GreaterThanOrEqual
                    | LessThan
                    | LessThanOrEqual
                    | IsEmpty
                    | IsNotEmpty
                    | IsOneOf
            ),
            ColumnKind::Boolean => matches!(self, Is | Equals | NotEquals),
            ColumnKind::Date => matches!(
                self,
                Is | IsNot
                    | IsAfter
                    | IsOnOrAfter
                    | IsBefore
                    | IsOnOrBefore
                    | IsEmpty
                    | IsNotEmpty
            ),
        }
    }

    pub fn needs_value(self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

/// How multiple filter conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    pub fn parse(raw: Option<&str>) -> CoreResult<Self> {
        match raw.map(|s| s.trim().to_ascii_uppercase()) {
            None => Ok(Self::And),
            Some(s) if s.is_empty() || s == "AND" => Ok(Self::And),
            Some(s) if s == "OR" => Ok(Self::Or),
            Some(_) => Err(CoreError::validation(common::INVALID_LOGIC_OPERATOR)),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One entry of the `filters` list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterCondition {
    pub column: String,
    pub operator: String,
    pub value: Option<String>,
}

/// Client-supplied page request. `end` is exclusive.
///
/// The single `column_name`/`condition`/`filter_expr` triple is the legacy
/// grid filter; `filters` carries the advanced multi-condition form. Both may
/// be present and are combined with `logic_operator`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaginationRequest {
    pub start: i64,
    pub end: i64,
    pub column_name: Option<String>,
    pub condition: Option<String>,
    pub filter_expr: Option<String>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    pub logic_operator: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub selected_ids: Vec<DbId>,
}

impl PaginationRequest {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Validate against `columns` and produce an executable [`PageQuery`].
    pub fn validate(&self, columns: &[ColumnSpec]) -> CoreResult<PageQuery> {
        if self.start < 0 {
            return Err(CoreError::validation(common::START_INDEX_NEGATIVE));
        }
        if self.end <= self.start {
            return Err(CoreError::validation(common::INVALID_PAGINATION));
        }

        // Columns and operators are checked for every condition before any
        // value is parsed.
        let mut pending = Vec::new();

        if let Some(column) = self.column_name.as_deref().filter(|c| !c.trim().is_empty()) {
            let spec = find_column(columns, column.trim())?;
            let expr = self.filter_expr.as_deref().map(str::trim).unwrap_or("");
            let condition = self.condition.as_deref().unwrap_or("contains");
            let operator = parse_operator(condition, spec)?;
            // An empty expression with a value operator means "no filter".
            if !expr.is_empty() || !operator.needs_value() {
                pending.push((spec, operator, Some(expr)));
            }
        }

        for filter in &self.filters {
            let spec = find_column(columns, filter.column.trim())?;
            let operator = parse_operator(&filter.operator, spec)?;
            pending.push((spec, operator, filter.value.as_deref()));
        }

        let logic = LogicOperator::parse(self.logic_operator.as_deref())?;

        let predicates = pending
            .into_iter()
            .map(|(spec, operator, raw)| Predicate::build(spec, operator, raw))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(PageQuery {
            offset: self.start,
            limit: Some(self.end - self.start),
            predicates,
            logic,
            include_deleted: self.include_deleted,
            selected_ids: self.selected_ids.clone(),
            scope: Vec::new(),
        })
    }
}

fn parse_operator(raw: &str, spec: ColumnSpec) -> CoreResult<Operator> {
    Operator::parse(raw)
        .filter(|op| op.supports(spec.kind))
        .ok_or_else(|| CoreError::validation(format!("{}{raw}", common::INVALID_OPERATOR_PREFIX)))
}

// ---------------------------------------------------------------------------
// Validated query
// ---------------------------------------------------------------------------

/// Typed filter value, parsed according to the column kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    None,
    Text(String),
    TextList(Vec<String>),
    Number(f64),
    NumberList(Vec<f64>),
    Bool(bool),
    Date(NaiveDate),
}

/// A single validated condition on an allow-listed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub kind: ColumnKind,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Predicate {
    fn build(spec: ColumnSpec, operator: Operator, raw: Option<&str>) -> CoreResult<Self> {
        let raw = raw.map(str::trim).unwrap_or("");
        if operator.needs_value() && raw.is_empty() {
            let name = format!("{operator:?}");
            return Err(CoreError::validation(format!(
                "{}{}",
                common::FILTER_VALUE_REQUIRED,
                lower_first(&name)
            )));
        }

        let invalid =
            || CoreError::validation(format!("{}{}", common::INVALID_FILTER_VALUE_PREFIX, spec.name));

        let value = if !operator.needs_value() {
            FilterValue::None
        } else {
            match (spec.kind, operator) {
                (ColumnKind::Text, Operator::IsOneOf | Operator::IsNotOneOf) => {
                    FilterValue::TextList(split_list(raw))
                }
                (ColumnKind::Text, _) => FilterValue::Text(raw.to_string()),
                (ColumnKind::Number, Operator::IsOneOf) => FilterValue::NumberList(
                    split_list(raw)
                        .iter()
                        .map(|v| v.parse::<f64>())
                        .collect::<Result<_, _>>()
                        .map_err(|_| invalid())?,
                ),
                (ColumnKind::Number, _) => {
                    FilterValue::Number(raw.parse::<f64>().map_err(|_| invalid())?)
                }
                (ColumnKind::Boolean, _) => match raw.to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => FilterValue::Bool(true),
                    "false" | "0" | "no" => FilterValue::Bool(false),
                    _ => return Err(invalid()),
                },
                (ColumnKind::Date, _) => FilterValue::Date(parse_date(raw).ok_or_else(invalid)?),
            }
        };

        Ok(Self {
            column: spec.name,
            kind: spec.kind,
            operator,
            value,
        })
    }

    /// Exact (case-insensitive) text match, used by services for internal lookups.
    pub fn text_equals(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            kind: ColumnKind::Text,
            operator: Operator::Equals,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn number_equals(column: &'static str, value: f64) -> Self {
        Self {
            column,
            kind: ColumnKind::Number,
            operator: Operator::Equals,
            value: FilterValue::Number(value),
        }
    }

    /// Evaluate the predicate against a serialized field value.
    ///
    /// Used by in-memory stores; mirrors the SQL the PostgreSQL store emits.
    pub fn matches(&self, field: &serde_json::Value) -> bool {
        use serde_json::Value;

        if self.operator == Operator::IsEmpty {
            return is_empty_value(field);
        }
        if self.operator == Operator::IsNotEmpty {
            return !is_empty_value(field);
        }

        match (&self.value, field) {
            (FilterValue::Text(expected), Value::String(actual)) => {
                let actual = actual.to_lowercase();
                let expected = expected.to_lowercase();
                match self.operator {
                    Operator::Contains => actual.contains(&expected),
                    Operator::Equals => actual == expected,
                    Operator::NotEquals => actual != expected,
                    Operator::StartsWith => actual.starts_with(&expected),
                    Operator::EndsWith => actual.ends_with(&expected),
                    _ => false,
                }
            }
            (FilterValue::Text(_), Value::Null) => self.operator == Operator::NotEquals,
            (FilterValue::TextList(options), Value::String(actual)) => {
                let hit = options.iter().any(|o| o.eq_ignore_ascii_case(actual));
                if self.operator == Operator::IsNotOneOf {
                    !hit
                } else {
                    hit
                }
            }
            (FilterValue::TextList(_), Value::Null) => self.operator == Operator::IsNotOneOf,
            (FilterValue::Number(expected), Value::Number(actual)) => {
                let actual = actual.as_f64().unwrap_or(f64::NAN);
                match self.operator {
                    Operator::Equals => actual == *expected,
                    Operator::NotEquals => actual != *expected,
                    Operator::GreaterThan => actual > *expected,
                    Operator::GreaterThanOrEqual => actual >= *expected,
                    Operator::LessThan => actual < *expected,
                    Operator::LessThanOrEqual => actual <= *expected,
                    _ => false,
                }
            }
            (FilterValue::NumberList(options), Value::Number(actual)) => {
                let actual = actual.as_f64().unwrap_or(f64::NAN);
                options.iter().any(|o| *o == actual)
            }
            (FilterValue::Bool(expected), Value::Bool(actual)) => match self.operator {
                Operator::NotEquals => actual != expected,
                _ => actual == expected,
            },
            (FilterValue::Date(expected), Value::String(raw)) => {
                let Some(actual) = parse_date(raw) else {
                    return false;
                };
                match self.operator {
                    Operator::Is => actual == *expected,
                    Operator::IsNot => actual != *expected,
                    Operator::IsAfter => actual > *expected,
                    Operator::IsOnOrAfter => actual >= *expected,
                    Operator::IsBefore => actual < *expected,
                    Operator::IsOnOrBefore => actual <= *expected,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

/// A validated, executable page query.
///
/// `limit = None` means unbounded; services use that for internal lookups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageQuery {
    pub offset: i64,
    pub limit: Option<i64>,
    pub predicates: Vec<Predicate>,
    pub logic: LogicOperator,
    pub include_deleted: bool,
    pub selected_ids: Vec<DbId>,
    /// Conditions every row must meet whatever `logic` says. Services add
    /// these to narrow a caller's query to one parent row.
    pub scope: Vec<Predicate>,
}

impl PageQuery {
    /// Unbounded query over live rows matching all `predicates`.
    pub fn matching(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates,
            ..Self::default()
        }
    }

    /// Add a condition that holds regardless of the caller's logic operator.
    pub fn within(mut self, predicate: Predicate) -> Self {
        self.scope.push(predicate);
        self
    }

    /// Whether a serialized row passes the scope, predicates and id selection.
    ///
    /// Row-level checks only; tenant and soft-delete scoping are the store's job.
    pub fn matches_row(&self, id: DbId, row: &serde_json::Value) -> bool {
        if !self.selected_ids.is_empty() && !self.selected_ids.contains(&id) {
            return false;
        }
        let null = serde_json::Value::Null;
        if !self.scope.iter().all(|p| p.matches(row.get(p.column).unwrap_or(&null))) {
            return false;
        }
        if self.predicates.is_empty() {
            return true;
        }
        let mut results = self
            .predicates
            .iter()
            .map(|p| p.matches(row.get(p.column).unwrap_or(&null)));
        match self.logic {
            LogicOperator::And => results.all(|hit| hit),
            LogicOperator::Or => results.any(|hit| hit),
        }
    }
}

/// A page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_data_count: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total_data_count: self.total_data_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_empty_value(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its UTC calendar day).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        raw.parse::<Timestamp>()
            .ok()
            .map(|ts| ts.date_naive())
    })
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    const COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::text("city"),
        ColumnSpec::number("company_size"),
        ColumnSpec::boolean("is_primary"),
        ColumnSpec::date("created_at"),
    ];

    #[test]
    fn test_end_not_after_start_is_rejected() {
        let err = PaginationRequest::new(10, 10).validate(COLUMNS).unwrap_err();
        assert_eq!(err, CoreError::validation(common::INVALID_PAGINATION));

        let mut request = PaginationRequest::new(5, 1);
        request.column_name = Some("not_a_column".into());
        let err = request.validate(COLUMNS).unwrap_err();
        assert_eq!(
            err,
            CoreError::validation(common::INVALID_PAGINATION),
            "window check must win over column check"
        );
    }

    #[test]
    fn test_negative_start_is_rejected() {
        let err = PaginationRequest::new(-1, 10).validate(COLUMNS).unwrap_err();
        assert_eq!(err, CoreError::validation(common::START_INDEX_NEGATIVE));
    }

    #[test]
    fn test_unknown_column_names_the_column() {
        let mut request = PaginationRequest::new(0, 10);
        request.column_name = Some("password_hash".into());
        request.filter_expr = Some("x".into());
        let err = request.validate(COLUMNS).unwrap_err();
        assert_eq!(err.to_string(), "Invalid column name: password_hash");
    }

    #[test]
    fn test_no_filter_produces_empty_predicates() {
        let query = PaginationRequest::new(20, 30).validate(COLUMNS).unwrap();
        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, Some(10));
        assert!(query.predicates.is_empty());
        assert_eq!(query.logic, LogicOperator::And);
    }

    #[test]
    fn test_column_without_expression_means_no_filter() {
        let mut request = PaginationRequest::new(0, 10);
        request.column_name = Some("city".into());
        request.condition = Some("contains".into());
        let query = request.validate(COLUMNS).unwrap();
        assert!(query.predicates.is_empty());
    }

    #[test]
    fn test_operator_must_match_column_kind() {
        let mut request = PaginationRequest::new(0, 10);
        request.filters.push(FilterCondition {
            column: "is_primary".into(),
            operator: "contains".into(),
            value: Some("true".into()),
        });
        let err = request.validate(COLUMNS).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operator: contains");
    }

    #[test]
    fn test_symbol_operators_are_normalized() {
        let mut request = PaginationRequest::new(0, 10);
        request.filters.push(FilterCondition {
            column: "company_size".into(),
            operator: ">=".into(),
            value: Some("50".into()),
        });
        let query = request.validate(COLUMNS).unwrap();
        assert_eq!(query.predicates[0].operator, Operator::GreaterThanOrEqual);
        assert_eq!(query.predicates[0].value, FilterValue::Number(50.0));
    }

    #[test]
    fn test_missing_value_is_rejected_except_for_emptiness_checks() {
        let mut request = PaginationRequest::new(0, 10);
        request.filters.push(FilterCondition {
            column: "city".into(),
            operator: "equals".into(),
            value: None,
        });
        assert_matches!(request.validate(COLUMNS), Err(CoreError::Validation(_)));

        request.filters[0].operator = "isEmpty".into();
        let query = request.validate(COLUMNS).unwrap();
        assert_eq!(query.predicates[0].value, FilterValue::None);
    }

    #[test]
    fn test_invalid_logic_operator() {
        let mut request = PaginationRequest::new(0, 10);
        request.logic_operator = Some("XOR".into());
        let err = request.validate(COLUMNS).unwrap_err();
        assert_eq!(err, CoreError::validation(common::INVALID_LOGIC_OPERATOR));
    }

    #[test]
    fn test_matches_row_with_or_logic() {
        let query = PageQuery {
            predicates: vec![
                Predicate::text_equals("city", "pune"),
                Predicate::number_equals("company_size", 10.0),
            ],
            logic: LogicOperator::Or,
            ..PageQuery::default()
        };
        let row = json!({"city": "Mumbai", "company_size": 10});
        assert!(query.matches_row(1, &row));

        let and_query = PageQuery {
            logic: LogicOperator::And,
            ..query
        };
        assert!(!and_query.matches_row(1, &row));
    }

    #[test]
    fn test_date_predicates_compare_calendar_days() {
        let mut request = PaginationRequest::new(0, 10);
        request.filters.push(FilterCondition {
            column: "created_at".into(),
            operator: "isOnOrAfter".into(),
            value: Some("2026-03-01".into()),
        });
        let query = request.validate(COLUMNS).unwrap();
        assert!(query.matches_row(1, &json!({"created_at": "2026-03-01T23:59:00Z"})));
        assert!(!query.matches_row(1, &json!({"created_at": "2026-02-28T10:00:00Z"})));
    }

    #[test]
    fn test_scope_holds_under_or_logic() {
        let query = PageQuery {
            predicates: vec![
                Predicate::text_equals("city", "pune"),
                Predicate::number_equals("company_size", 10.0),
            ],
            logic: LogicOperator::Or,
            ..PageQuery::default()
        }
        .within(Predicate::number_equals("product_id", 4.0));

        assert!(query.matches_row(1, &json!({"city": "Pune", "company_size": 1, "product_id": 4})));
        assert!(!query.matches_row(1, &json!({"city": "Pune", "company_size": 10, "product_id": 5})));
    }

    #[test]
    fn test_selected_ids_restrict_rows() {
        let query = PageQuery {
            selected_ids: vec![3, 4],
            ..PageQuery::default()
        };
        assert!(query.matches_row(3, &json!({})));
        assert!(!query.matches_row(5, &json!({})));
    }
}
