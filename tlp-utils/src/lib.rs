mod attrs;
pub use attrs::*;
