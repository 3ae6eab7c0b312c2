#[cfg(feature = "hashbrown")]
pub use hashbrown::HashSet;
#[cfg(not(feature = "hashbrown"))]
pub use std::collections::HashSet;
