pub mod fetch;
pub mod model;
pub mod output;
pub mod reports;
pub mod session;
