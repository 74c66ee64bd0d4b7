//! Booking pricing persistence, legacy reservation sync and the services built on them.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;

#[cfg(test)]
mod test;

mod uuids;
