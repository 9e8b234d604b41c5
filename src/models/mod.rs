pub mod application;
pub mod document;
pub mod enums;
pub mod filters;
pub mod profile;

pub use application::*;
pub use document::*;
pub use enums::*;
pub use filters::*;
pub use profile::*;
