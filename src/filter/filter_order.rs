use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection, SortField};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse a comma-separated sort spec such as `"-createdAt,title"`.
    /// A leading `-` sorts that field descending.
    pub fn parse(spec: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (name, sort) = match trimmed.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (trimmed.strip_prefix('+').unwrap_or(trimmed), SortDirection::Asc),
            };
            let field = SortField::parse(name).ok_or_else(|| FilterError::UnsupportedSortField(name.to_string()))?;
            out.push(FilterOrderInfo { field, sort });
        }
        Ok(out)
    }

    /// Newest first
    pub fn default_order() -> Vec<FilterOrderInfo> {
        vec![FilterOrderInfo { field: SortField::CreatedAt, sort: SortDirection::Desc }]
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.field.column(), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefix_directions() {
        let order = FilterOrder::parse("-createdAt, title").unwrap();
        assert_eq!(
            order,
            vec![
                FilterOrderInfo { field: SortField::CreatedAt, sort: SortDirection::Desc },
                FilterOrderInfo { field: SortField::Title, sort: SortDirection::Asc },
            ]
        );
        assert_eq!(FilterOrder::generate(&order), "ORDER BY \"created_at\" DESC, \"title\" ASC");
    }

    #[test]
    fn rejects_unknown_fields() {
        assert_eq!(
            FilterOrder::parse("priority,password"),
            Err(FilterError::UnsupportedSortField("password".into()))
        );
    }

    #[test]
    fn empty_spec_yields_no_order() {
        assert!(FilterOrder::parse(" , ").unwrap().is_empty());
        assert_eq!(FilterOrder::generate(&[]), "");
    }
}
