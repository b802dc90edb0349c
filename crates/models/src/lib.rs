//! SeaORM entities for the City Info schema plus the connection helper.
//!
//! Each entity module also carries small query helpers generic over
//! `ConnectionTrait`, so callers can run them on a pool or inside a
//! transaction.

pub mod errors;
pub mod db;
pub mod city;
pub mod point_of_interest;

#[cfg(test)]
mod tests;
