// handlers/protected/department/mod.rs - Department account routes (/api/department/*)
pub mod grievances;

pub use grievances::grievances_get;
