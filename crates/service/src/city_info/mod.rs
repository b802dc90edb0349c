//! Cities and their points of interest: domain entities, wire DTOs, the
//! mapper between them, the patch engine, repositories and services.

pub mod entities;
pub mod dto;
pub mod validation;
pub mod mapper;
pub mod patch;
pub mod repository;
pub mod repo;
pub mod service;

pub use repository::{CityInfoRepository, RepositoryFactory};
pub use service::{CityService, PointOfInterestService};
