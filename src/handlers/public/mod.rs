// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: none (`/`, `/health`)
pub mod system;

pub use system::{health, root};
