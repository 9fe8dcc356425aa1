pub mod artifact;
pub mod betting;
pub mod error;
pub mod events;
pub mod features;
pub mod market;
pub mod predictions;
pub mod team;

pub use artifact::*;
pub use betting::*;
pub use error::*;
pub use events::*;
pub use features::*;
pub use market::*;
pub use predictions::*;
pub use team::*;
