mod handler;

pub use handler::analyze;
