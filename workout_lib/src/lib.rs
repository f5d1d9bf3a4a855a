pub mod config;
pub mod form;
pub mod store;
pub mod summary;
pub mod tracker;
pub mod workout;
