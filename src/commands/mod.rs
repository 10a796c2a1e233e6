pub mod migrate;

pub use migrate::{MigrateCommand, Outcome};
