//! Python client generation: one manager class per OpenAPI tag on top of
//! `requests` or `aiohttp`, plus a Pydantic `models.py`.

pub mod emitters;
pub mod error;
pub mod generator;
pub mod ir;
pub mod naming;
pub mod operation;
pub mod printer;
pub mod type_mapper;

pub use error::GenerateError;
pub use generator::{ManagerPhase, ProjectGenerator};
