use serde_json::Value;

use super::error::FilterError;
use super::types::{ColumnDef, FilterOp, PgType};

/// Compiles a JSON WHERE document into a parameterised SQL predicate.
///
/// Field conditions are either implicit equality (`{"status": "active"}`) or
/// operator objects (`{"date": {"$gte": "..."}}`). `$and`, `$or` and `$not`
/// nest. Every parameter is cast to its column's type so text values can be
/// bound against uuid, numeric and timestamp columns.
pub struct FilterWhere<'a> {
    columns: &'a [ColumnDef],
    param_values: Vec<Value>,
}

impl<'a> FilterWhere<'a> {
    pub fn new(columns: &'a [ColumnDef]) -> Self {
        Self {
            columns,
            param_values: vec![],
        }
    }

    /// Returns the predicate (empty when there is nothing to filter on) and its parameters.
    pub fn generate(where_data: &Value, columns: &'a [ColumnDef]) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(columns);
        let sql = filter_where.build(where_data)?;
        Ok((sql, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build(&mut self, where_data: &Value) -> Result<String, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(String::new()),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        };

        let mut parts = Vec::new();
        for (key, value) in obj {
            if key.starts_with('$') {
                parts.push(self.build_logical(key, value)?);
            } else {
                parts.extend(self.build_field(key, value)?);
            }
        }
        Ok(parts.join(" AND "))
    }

    fn build_logical(&mut self, op: &str, value: &Value) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let mut sql_parts = Vec::new();
                for v in arr {
                    let sql = self.build(v)?;
                    if !sql.is_empty() {
                        sql_parts.push(format!("({})", sql));
                    }
                }
                if sql_parts.is_empty() {
                    // An empty conjunction matches everything, an empty disjunction nothing
                    return Ok(if op == "$and" { "1=1" } else { "1=0" }.to_string());
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            "$not" => {
                let sql = self.build(value)?;
                if sql.is_empty() {
                    return Ok("1=0".to_string());
                }
                Ok(format!("NOT ({})", sql))
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn build_field(&mut self, field: &str, value: &Value) -> Result<Vec<String>, FilterError> {
        let column = *self
            .columns
            .iter()
            .find(|c| c.name == field)
            .ok_or_else(|| FilterError::InvalidColumn(field.to_string()))?;

        match value {
            Value::Object(obj) if obj.keys().all(|k| k.starts_with('$')) && !obj.is_empty() => {
                let mut out = Vec::new();
                for (op_key, op_val) in obj {
                    let operator = Self::map_operator(op_key)?;
                    out.push(self.build_condition(column, operator, op_val)?);
                }
                Ok(out)
            }
            // Implicit equality: { field: value }
            _ => Ok(vec![self.build_condition(column, FilterOp::Eq, value)?]),
        }
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Neq,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$ilike" => FilterOp::ILike,
            "$in" => FilterOp::In,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn build_condition(&mut self, column: ColumnDef, operator: FilterOp, data: &Value) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", column.name);
        let comparison = |symbol: &str, this: &mut Self| format!("{} {} {}", quoted_column, symbol, this.param(data.clone(), column.pg_type));

        Ok(match operator {
            FilterOp::Eq if data.is_null() => format!("{} IS NULL", quoted_column),
            FilterOp::Neq if data.is_null() => format!("{} IS NOT NULL", quoted_column),
            FilterOp::Eq => comparison("=", self),
            FilterOp::Neq => comparison("<>", self),
            FilterOp::Gt => comparison(">", self),
            FilterOp::Gte => comparison(">=", self),
            FilterOp::Lt => comparison("<", self),
            FilterOp::Lte => comparison("<=", self),
            FilterOp::ILike => {
                if column.pg_type != PgType::Text {
                    return Err(FilterError::InvalidOperatorData(format!("$ilike requires a text column, got {}", column.name)));
                }
                if !data.is_string() {
                    return Err(FilterError::InvalidOperatorData("$ilike requires a string pattern".to_string()));
                }
                comparison("ILIKE", self)
            }
            FilterOp::In => match data {
                Value::Array(values) if values.is_empty() => "1=0".to_string(),
                Value::Array(values) => {
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone(), column.pg_type)).collect();
                    format!("{} IN ({})", quoted_column, params.join(", "))
                }
                _ => comparison("=", self),
            },
        })
    }

    fn param(&mut self, value: Value, pg_type: PgType) -> String {
        self.param_values.push(value);
        format!("${}::{}", self.param_values.len(), pg_type.cast())
    }
}

/// Escapes LIKE wildcards so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", PgType::Uuid),
        ColumnDef::new("name", PgType::Text),
        ColumnDef::new("status", PgType::Text),
        ColumnDef::new("date", PgType::Timestamptz),
        ColumnDef::new("total", PgType::Numeric),
    ];

    #[test]
    fn implicit_equality_casts_to_column_type() {
        let (sql, params) = FilterWhere::generate(&json!({ "id": "3f1c" }), COLUMNS).unwrap();
        assert_eq!(sql, "\"id\" = $1::uuid");
        assert_eq!(params, vec![json!("3f1c")]);
    }

    #[test]
    fn range_operators_share_one_parameter_sequence() {
        // Conditions come out in column-name order
        let where_data = json!({
            "status": "active",
            "date": { "$gte": "2025-01-01T00:00:00Z", "$lt": "2025-02-01T00:00:00Z" }
        });
        let (sql, params) = FilterWhere::generate(&where_data, COLUMNS).unwrap();
        assert_eq!(
            sql,
            "\"date\" >= $1::timestamptz AND \"date\" < $2::timestamptz AND \"status\" = $3::text"
        );
        assert_eq!(
            params,
            vec![json!("2025-01-01T00:00:00Z"), json!("2025-02-01T00:00:00Z"), json!("active")]
        );
    }

    #[test]
    fn nested_logical_operators_keep_numbering() {
        let where_data = json!({
            "$or": [ { "status": "active" }, { "status": "paused" } ],
            "name": { "$ilike": "%apollo%" }
        });
        let (sql, params) = FilterWhere::generate(&where_data, COLUMNS).unwrap();
        assert_eq!(
            sql,
            "((\"status\" = $1::text) OR (\"status\" = $2::text)) AND \"name\" ILIKE $3::text"
        );
        assert_eq!(params, vec![json!("active"), json!("paused"), json!("%apollo%")]);
    }

    #[test]
    fn in_expands_each_value() {
        let (sql, params) = FilterWhere::generate(&json!({ "id": { "$in": ["a", "b"] } }), COLUMNS).unwrap();
        assert_eq!(sql, "\"id\" IN ($1::uuid, $2::uuid)");
        assert_eq!(params.len(), 2);

        let (sql, params) = FilterWhere::generate(&json!({ "id": { "$in": [] } }), COLUMNS).unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn null_equality_becomes_is_null() {
        let (sql, params) = FilterWhere::generate(&json!({ "name": null }), COLUMNS).unwrap();
        assert_eq!(sql, "\"name\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn unknown_columns_and_operators_are_rejected() {
        assert!(matches!(
            FilterWhere::generate(&json!({ "password": "x" }), COLUMNS),
            Err(FilterError::InvalidColumn(_))
        ));
        assert!(matches!(
            FilterWhere::generate(&json!({ "name": { "$regex": "x" } }), COLUMNS),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            FilterWhere::generate(&json!({ "total": { "$ilike": "1%" } }), COLUMNS),
            Err(FilterError::InvalidOperatorData(_))
        ));
    }

    #[test]
    fn empty_document_produces_no_predicate() {
        let (sql, params) = FilterWhere::generate(&json!({}), COLUMNS).unwrap();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn escape_like_neutralises_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Apollo"), "Apollo");
    }
}
