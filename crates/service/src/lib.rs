//! Service layer for the City Info API.
//! - Separates business logic (existence checks, validation, patching) from data access.
//! - Repositories are per-request units of work over either an in-memory store or SeaORM.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod mail;
pub mod city_info;
