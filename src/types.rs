mod hashmap;
mod hashset;

pub use hashmap::HashMap;
pub use hashset::HashSet;
