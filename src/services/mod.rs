pub mod catalog;
pub mod config;
pub mod enhancement;
pub mod importer;
pub mod resolver;
pub mod synthesis;
