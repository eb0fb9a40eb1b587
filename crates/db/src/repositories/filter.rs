//! WHERE-clause builder for paginated queries.
//!
//! Column names come from the validated [`PageQuery`], whose predicates only
//! carry allow-listed `&'static str` columns. Values are always bound.

use bizhub_core::pagination::{ColumnKind, FilterValue, Operator, PageQuery, Predicate};
use bizhub_core::types::DbId;
use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// A bind value collected while building a filter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    Id(DbId),
    IdList(Vec<DbId>),
    Text(String),
    TextList(Vec<String>),
    Number(f64),
    NumberList(Vec<f64>),
    Bool(bool),
    Date(NaiveDate),
}

/// Build `WHERE ...` for a tenant's rows matching `query`.
///
/// Returns the clause, the values to bind in order and the next free
/// parameter index.
pub(crate) fn build_filter(
    tenant_column: &str,
    soft_delete: bool,
    client_id: DbId,
    query: &PageQuery,
) -> (String, Vec<BindValue>, usize) {
    let mut conditions = vec![format!("{tenant_column} = $1")];
    let mut values = vec![BindValue::Id(client_id)];
    let mut bind_idx = 2usize;

    if soft_delete && !query.include_deleted {
        conditions.push("is_deleted = FALSE".to_string());
    }

    if !query.selected_ids.is_empty() {
        conditions.push(format!("id = ANY(${bind_idx})"));
        values.push(BindValue::IdList(query.selected_ids.clone()));
        bind_idx += 1;
    }

    for predicate in &query.scope {
        conditions.push(predicate_sql(predicate, &mut values, &mut bind_idx));
    }

    if !query.predicates.is_empty() {
        let parts: Vec<String> = query
            .predicates
            .iter()
            .map(|p| predicate_sql(p, &mut values, &mut bind_idx))
            .collect();
        conditions.push(format!("({})", parts.join(query.logic.as_sql())));
    }

    (format!("WHERE {}", conditions.join(" AND ")), values, bind_idx)
}

fn predicate_sql(predicate: &Predicate, values: &mut Vec<BindValue>, bind_idx: &mut usize) -> String {
    let col = predicate.column;

    match predicate.operator {
        Operator::IsEmpty if predicate.kind == ColumnKind::Text => {
            return format!("({col} IS NULL OR TRIM({col}) = '')");
        }
        Operator::IsNotEmpty if predicate.kind == ColumnKind::Text => {
            return format!("({col} IS NOT NULL AND TRIM({col}) <> '')");
        }
        Operator::IsEmpty => return format!("{col} IS NULL"),
        Operator::IsNotEmpty => return format!("{col} IS NOT NULL"),
        _ => {}
    }

    let idx = *bind_idx;
    let (sql, value) = match (&predicate.value, predicate.operator) {
        (FilterValue::Text(v), Operator::Contains) => (
            format!("{col} ILIKE ${idx}"),
            BindValue::Text(format!("%{}%", escape_like(v))),
        ),
        (FilterValue::Text(v), Operator::StartsWith) => (
            format!("{col} ILIKE ${idx}"),
            BindValue::Text(format!("{}%", escape_like(v))),
        ),
        (FilterValue::Text(v), Operator::EndsWith) => (
            format!("{col} ILIKE ${idx}"),
            BindValue::Text(format!("%{}", escape_like(v))),
        ),
        (FilterValue::Text(v), Operator::NotEquals) => (
            format!("({col} IS NULL OR LOWER({col}) <> LOWER(${idx}))"),
            BindValue::Text(v.clone()),
        ),
        (FilterValue::Text(v), _) => (
            format!("LOWER({col}) = LOWER(${idx})"),
            BindValue::Text(v.clone()),
        ),
        (FilterValue::TextList(list), op) => {
            let lowered = list.iter().map(|v| v.to_lowercase()).collect();
            let sql = if op == Operator::IsNotOneOf {
                format!("({col} IS NULL OR NOT (LOWER({col}) = ANY(${idx})))")
            } else {
                format!("LOWER({col}) = ANY(${idx})")
            };
            (sql, BindValue::TextList(lowered))
        }
        (FilterValue::Number(n), op) => (
            format!("{col}::DOUBLE PRECISION {} ${idx}", comparison(op)),
            BindValue::Number(*n),
        ),
        (FilterValue::NumberList(list), _) => (
            format!("{col}::DOUBLE PRECISION = ANY(${idx})"),
            BindValue::NumberList(list.clone()),
        ),
        (FilterValue::Bool(b), op) => (
            format!("{col} {} ${idx}", comparison(op)),
            BindValue::Bool(*b),
        ),
        (FilterValue::Date(d), op) => (
            format!("({col} AT TIME ZONE 'UTC')::date {} ${idx}", comparison(op)),
            BindValue::Date(*d),
        ),
        (FilterValue::None, _) => return "TRUE".to_string(),
    };

    values.push(value);
    *bind_idx += 1;
    sql
}

fn comparison(op: Operator) -> &'static str {
    match op {
        Operator::NotEquals | Operator::IsNot => "<>",
        Operator::GreaterThan | Operator::IsAfter => ">",
        Operator::GreaterThanOrEqual | Operator::IsOnOrAfter => ">=",
        Operator::LessThan | Operator::IsBefore => "<",
        Operator::LessThanOrEqual | Operator::IsOnOrBefore => "<=",
        _ => "=",
    }
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

// ---------------------------------------------------------------------------
// Bind helpers
// ---------------------------------------------------------------------------

pub(crate) fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        q = match value {
            BindValue::Id(v) => q.bind(*v),
            BindValue::IdList(v) => q.bind(v),
            BindValue::Text(v) => q.bind(v),
            BindValue::TextList(v) => q.bind(v),
            BindValue::Number(v) => q.bind(*v),
            BindValue::NumberList(v) => q.bind(v),
            BindValue::Bool(v) => q.bind(*v),
            BindValue::Date(v) => q.bind(*v),
        };
    }
    q
}

pub(crate) fn bind_values_scalar<'q, O>(
    mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for value in values {
        q = match value {
            BindValue::Id(v) => q.bind(*v),
            BindValue::IdList(v) => q.bind(v),
            BindValue::Text(v) => q.bind(v),
            BindValue::TextList(v) => q.bind(v),
            BindValue::Number(v) => q.bind(*v),
            BindValue::NumberList(v) => q.bind(v),
            BindValue::Bool(v) => q.bind(*v),
            BindValue::Date(v) => q.bind(*v),
        };
    }
    q
}

#[cfg(test)]
mod tests {
    use bizhub_core::pagination::{ColumnSpec, FilterCondition, LogicOperator, PaginationRequest};

    use super::*;

    const COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::text("city"),
        ColumnSpec::number("quantity"),
        ColumnSpec::date("created_at"),
    ];

    fn query(filters: Vec<(&str, &str, &str)>, logic: Option<&str>) -> PageQuery {
        let mut req = PaginationRequest::new(0, 10);
        req.filters = filters
            .into_iter()
            .map(|(column, operator, value)| FilterCondition {
                column: column.into(),
                operator: operator.into(),
                value: Some(value.into()),
            })
            .collect();
        req.logic_operator = logic.map(str::to_string);
        req.validate(COLUMNS).unwrap()
    }

    #[test]
    fn test_tenant_and_soft_delete_always_applied() {
        let (clause, values, next) = build_filter("client_id", true, 7, &PageQuery::default());
        assert_eq!(clause, "WHERE client_id = $1 AND is_deleted = FALSE");
        assert_eq!(values, vec![BindValue::Id(7)]);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_scope_is_anded_outside_the_logic_group() {
        let q = query(vec![("city", "equals", "Pune"), ("quantity", ">", "2")], Some("OR"))
            .within(Predicate::number_equals("product_id", 9.0));
        let (clause, values, next) = build_filter("client_id", true, 3, &q);
        assert_eq!(
            clause,
            "WHERE client_id = $1 AND is_deleted = FALSE \
             AND product_id::DOUBLE PRECISION = $2 \
             AND (LOWER(city) = LOWER($3) OR quantity::DOUBLE PRECISION > $4)"
        );
        assert_eq!(values[1], BindValue::Number(9.0));
        assert_eq!(next, 5);
    }

    #[test]
    fn test_include_deleted_and_append_only_tables() {
        let q = PageQuery {
            include_deleted: true,
            ..PageQuery::default()
        };
        let (clause, _, _) = build_filter("client_id", true, 1, &q);
        assert_eq!(clause, "WHERE client_id = $1");

        let (clause, _, _) = build_filter("client_id", false, 1, &PageQuery::default());
        assert_eq!(clause, "WHERE client_id = $1");
    }

    #[test]
    fn test_predicates_grouped_with_logic() {
        let q = query(
            vec![("city", "contains", "50%_off"), ("quantity", ">=", "3")],
            Some("or"),
        );
        assert_eq!(q.logic, LogicOperator::Or);
        let (clause, values, next) = build_filter("client_id", true, 1, &q);
        assert_eq!(
            clause,
            "WHERE client_id = $1 AND is_deleted = FALSE AND \
             (city ILIKE $2 OR quantity::DOUBLE PRECISION >= $3)"
        );
        assert_eq!(values[1], BindValue::Text("%50\\%\\_off%".into()));
        assert_eq!(values[2], BindValue::Number(3.0));
        assert_eq!(next, 4);
    }

    #[test]
    fn test_selected_ids_and_dates() {
        let mut q = query(vec![("created_at", "isOnOrAfter", "2026-01-31")], None);
        q.selected_ids = vec![4, 5];
        let (clause, values, _) = build_filter("id", true, 9, &q);
        assert_eq!(
            clause,
            "WHERE id = $1 AND is_deleted = FALSE AND id = ANY($2) AND \
             ((created_at AT TIME ZONE 'UTC')::date >= $3)"
        );
        assert_eq!(values[1], BindValue::IdList(vec![4, 5]));
    }

    #[test]
    fn test_empty_operators_bind_nothing() {
        let mut req = PaginationRequest::new(0, 5);
        req.filters = vec![FilterCondition {
            column: "city".into(),
            operator: "isEmpty".into(),
            value: None,
        }];
        let q = req.validate(COLUMNS).unwrap();
        let (clause, values, next) = build_filter("client_id", true, 1, &q);
        assert!(clause.ends_with("((city IS NULL OR TRIM(city) = ''))"));
        assert_eq!(values.len(), 1);
        assert_eq!(next, 2);
    }
}
