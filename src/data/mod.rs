pub mod post;

pub use post::{Post, PostCollection, PostId};
