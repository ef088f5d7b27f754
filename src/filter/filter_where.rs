use super::types::{FilterScope, FilterWhereInfo, SqlParam};

/// Builds a parameterised WHERE clause from a scope plus equality conditions
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(scope: &FilterScope, conditions: &[FilterWhereInfo]) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(0);
        filter_where.build(scope, conditions)
    }

    fn build(&mut self, scope: &FilterScope, conditions: &[FilterWhereInfo]) -> (String, Vec<SqlParam>) {
        let mut sql_conditions = vec![];

        match scope {
            FilterScope::All => {}
            FilterScope::SubmittedBy(id) => {
                sql_conditions.push(format!("\"submitted_by\" = {}", self.param(SqlParam::Uuid(*id))));
            }
            FilterScope::Department(id) => {
                sql_conditions.push(format!("\"department\" = {}", self.param(SqlParam::Uuid(*id))));
            }
        }

        for condition in conditions {
            let placeholder = self.param(condition.param());
            sql_conditions.push(format!("\"{}\" = {}", condition.column(), placeholder));
        }

        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        (where_clause, self.param_values.clone())
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use uuid::Uuid;

    #[test]
    fn scope_comes_first_then_conditions() {
        let owner = Uuid::new_v4();
        let (sql, params) = FilterWhere::generate(
            &FilterScope::SubmittedBy(owner),
            &[FilterWhereInfo::Status(Status::Pending), FilterWhereInfo::Priority("High".into())],
        );
        assert_eq!(sql, "\"submitted_by\" = $1 AND \"status\" = $2 AND \"priority\" = $3");
        assert_eq!(
            params,
            vec![SqlParam::Uuid(owner), SqlParam::Text("Pending".into()), SqlParam::Text("High".into())]
        );
    }

    #[test]
    fn unscoped_without_conditions_matches_everything() {
        let (sql, params) = FilterWhere::generate(&FilterScope::All, &[]);
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }
}
