//! # Creche CLI
//!
//! Administrative tasks that have no HTTP endpoint: creating admin accounts
//! and filling a development database with fake data.
//!
//! ```ignore
//! use creche_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::new(10)).await?;
//! ```

pub mod admin;
pub mod seeder;
