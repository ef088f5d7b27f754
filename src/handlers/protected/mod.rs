// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware injects the caller's Principal; department
// routes additionally pass through require_department.
pub mod department;
pub mod departments;
pub mod grievances;

pub use departments::departments_get;
