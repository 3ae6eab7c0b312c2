#[cfg(feature = "hashbrown")]
pub use hashbrown::HashMap;
#[cfg(not(feature = "hashbrown"))]
pub use std::collections::HashMap;
