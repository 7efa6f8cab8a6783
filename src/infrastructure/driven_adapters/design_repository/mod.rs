//! Design Repository Implementations

mod postgres;

pub use postgres::PostgresDesignRepository;
