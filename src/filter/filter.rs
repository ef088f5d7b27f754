use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, FilterScope, FilterWhereInfo, SqlResult};

/// Listing query over a grievance table: scope, equality filters, then sort.
///
/// The same value drives both the SQL generator used by the Postgres store and
/// the in-process evaluation used by the memory store.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    scope: FilterScope,
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>, scope: FilterScope) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            scope,
            where_data: vec![],
            order_data: FilterOrder::default_order(),
        })
    }

    /// Apply query-string parameters. Blank values are ignored the same way an
    /// absent parameter is.
    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(status) = non_blank(data.status) {
            let status = status.parse().map_err(FilterError::InvalidValue)?;
            self.where_clause(FilterWhereInfo::Status(status));
        }
        if let Some(category) = non_blank(data.category) {
            let category = category.parse().map_err(FilterError::InvalidValue)?;
            self.where_clause(FilterWhereInfo::Category(category));
        }
        if let Some(priority) = non_blank(data.priority) {
            self.where_clause(FilterWhereInfo::Priority(priority));
        }
        if let Some(sort) = non_blank(data.sort) {
            self.order(&sort)?;
        }
        Ok(self)
    }

    pub fn where_clause(&mut self, condition: FilterWhereInfo) -> &mut Self {
        self.where_data.push(condition);
        self
    }

    /// Replace the ordering. An effectively empty spec keeps newest-first.
    pub fn order(&mut self, spec: &str) -> Result<&mut Self, FilterError> {
        let parsed = FilterOrder::parse(spec)?;
        if !parsed.is_empty() {
            self.order_data = parsed;
        }
        Ok(self)
    }

    pub fn scope(&self) -> &FilterScope {
        &self.scope
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.where_data
    }

    pub fn ordering(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn to_sql(&self, columns: &str) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.scope, &self.where_data);
        let order_clause = FilterOrder::generate(&self.order_data);

        let query = [
            format!("SELECT {}", columns),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        match chars.next() {
            None => Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())),
            Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
                Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)))
            }
            Some(_) if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)))
            }
            Some(_) => Ok(()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
