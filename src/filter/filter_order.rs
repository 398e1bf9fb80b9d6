use serde_json::Value;

use super::error::FilterError;
use super::types::{ColumnDef, FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value, columns: &[ColumnDef]) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let infos = match order {
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // Expect array of strings like ["last_updated_at desc", "name asc"]
                let mut out = Vec::new();
                for v in arr {
                    if let Value::String(s) = v {
                        out.extend(Self::parse_order_string(s));
                    }
                }
                out
            }
            Value::Object(obj) => {
                // { "last_updated_at": "desc", "name": "asc" }
                obj.iter()
                    .map(|(k, v)| {
                        let sort = match v.as_str().unwrap_or("asc").to_ascii_lowercase().as_str() {
                            "desc" => SortDirection::Desc,
                            _ => SortDirection::Asc,
                        };
                        FilterOrderInfo { column: k.clone(), sort }
                    })
                    .collect()
            }
            _ => vec![],
        };

        for info in &infos {
            if !columns.iter().any(|c| c.name == info.column) {
                return Err(FilterError::InvalidColumn(info.column.clone()));
            }
        }
        Ok(infos)
    }

    /// Accepts "col", "col desc", "-col" and comma-separated lists of those.
    fn parse_order_string(s: &str) -> Vec<FilterOrderInfo> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let (col, mut sort) = match col.strip_prefix('-') {
                    Some(stripped) => (stripped, SortDirection::Desc),
                    None => (col, SortDirection::Asc),
                };
                if let Some(dir) = it.next() {
                    sort = if dir.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc };
                }
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        out
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::PgType;
    use serde_json::json;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("name", PgType::Text),
        ColumnDef::new("last_updated_at", PgType::Timestamptz),
    ];

    #[test]
    fn mongo_style_minus_prefix_sorts_descending() {
        let infos = FilterOrder::validate_and_parse(&json!("-last_updated_at"), COLUMNS).unwrap();
        assert_eq!(FilterOrder::generate(&infos), "ORDER BY \"last_updated_at\" DESC");
    }

    #[test]
    fn mixed_list_and_object_forms() {
        let infos = FilterOrder::validate_and_parse(&json!("last_updated_at desc, name"), COLUMNS).unwrap();
        assert_eq!(FilterOrder::generate(&infos), "ORDER BY \"last_updated_at\" DESC, \"name\" ASC");

        let infos = FilterOrder::validate_and_parse(&json!({ "name": "DESC" }), COLUMNS).unwrap();
        assert_eq!(infos[0].sort, SortDirection::Desc);
    }

    #[test]
    fn rejects_unknown_columns() {
        let err = FilterOrder::validate_and_parse(&json!("name; DROP TABLE projects"), COLUMNS).unwrap_err();
        assert!(matches!(err, FilterError::InvalidColumn(_)));
    }
}
