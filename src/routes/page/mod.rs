mod handler;
mod model;

pub use handler::{health, show_page};
pub use model::{MainContent, PageQuery, PageView, UploadHint};
