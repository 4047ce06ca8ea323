//! PostgreSQL adapters
//!
//! Implementations of port traits using SeaORM and PostgreSQL.

pub mod evaluation_repo;
pub mod player_directory;
pub mod trace_sink;

pub use evaluation_repo::PostgresEvaluationRepository;
pub use player_directory::PostgresPlayerDirectory;
pub use trace_sink::PostgresTraceSink;
