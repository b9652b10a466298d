// Library for tests to access modules

pub mod backfill;
pub mod clock;
pub mod config;
pub mod error;
pub mod finance_repo;
pub mod models;
pub mod routes;
