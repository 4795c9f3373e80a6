mod handler;
mod model;

pub use handler::{login, logout, navigate, register};
pub use model::{CredentialsRequest, GateView, NavigateRequest};
