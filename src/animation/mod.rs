pub mod easing;
pub mod fly;

pub use easing::{lerp, EasingType};
pub use fly::{FlyAnimation, FlyFrame};
