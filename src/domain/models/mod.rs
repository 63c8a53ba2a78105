pub mod bulk;
pub mod object;
pub mod settings;

pub use bulk::*;
pub use object::*;
pub use settings::*;
