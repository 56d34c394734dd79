//! Post domain entities.

pub mod category;
pub mod event;
pub mod model;

pub use category::PostCategory;
pub use event::{PostCreated, PostEvent};
pub use model::Post;
