pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryGrievanceStore;
pub use postgres::PgGrievanceStore;
pub use repository::{GrievanceStore, GRIEVANCE_TABLE};
