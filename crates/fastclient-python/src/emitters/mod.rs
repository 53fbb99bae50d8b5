pub mod manager;
pub mod manager_file;
pub mod method;
pub mod models;
pub mod query_model;
