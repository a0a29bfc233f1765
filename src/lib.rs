pub mod account;
pub mod cli;
pub mod processor;
pub mod summary;
pub mod transaction;
