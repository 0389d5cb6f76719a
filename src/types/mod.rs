pub mod errors;
pub mod references;

pub use errors::{ImportError, ImportResult};
pub use references::{CompositeGroup, RawReference};
