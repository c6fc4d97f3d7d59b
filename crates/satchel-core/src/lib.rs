pub mod editor;
pub mod error;
pub mod ids;
pub mod io;
pub mod lock;
pub mod paths;
pub mod picker;
pub mod range;
pub mod store;
pub mod tmpedit;

pub use error::{Result, SatchelError};
