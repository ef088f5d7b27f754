use serde::Deserialize;
use uuid::Uuid;

use crate::types::{Category, Status};

/// Raw listing parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterData {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
}

/// Base set of rows a listing may ever see, applied before any filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    All,
    SubmittedBy(Uuid),
    Department(Uuid),
}

/// Exact-match narrowing condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterWhereInfo {
    Status(Status),
    Category(Category),
    Priority(String),
}

impl FilterWhereInfo {
    pub fn column(&self) -> &'static str {
        match self {
            FilterWhereInfo::Status(_) => "status",
            FilterWhereInfo::Category(_) => "category",
            FilterWhereInfo::Priority(_) => "priority",
        }
    }

    pub fn param(&self) -> SqlParam {
        match self {
            FilterWhereInfo::Status(s) => SqlParam::Text(s.as_str().to_string()),
            FilterWhereInfo::Category(c) => SqlParam::Text(c.as_str().to_string()),
            FilterWhereInfo::Priority(p) => SqlParam::Text(p.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Fields a listing may be ordered by, named as clients see them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Category,
    Priority,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "createdAt" | "created_at" => SortField::CreatedAt,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            "title" => SortField::Title,
            "status" => SortField::Status,
            "category" => SortField::Category,
            "priority" => SortField::Priority,
            _ => return None,
        })
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::Category => "category",
            SortField::Priority => "priority",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub field: SortField,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Uuid(Uuid),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
