pub mod object_key;
pub mod region;

pub use object_key::{ObjectKey, normalize_key};
pub use region::Region;
