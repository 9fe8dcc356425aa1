pub mod booster;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod models;
pub mod training;

pub use booster::*;
pub use error::*;
pub use evaluation::*;
pub use features::*;
pub use models::*;
pub use training::*;
