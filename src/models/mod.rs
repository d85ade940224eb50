pub mod registration;
pub mod warden;

pub use registration::*;
pub use warden::*;
