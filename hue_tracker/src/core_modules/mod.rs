pub mod compositor;
pub mod draw;
pub mod mask;
pub mod moment;
pub mod pixel;
pub mod tracker;
pub mod trail;
pub mod utils;
