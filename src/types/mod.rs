pub mod journal;
pub mod options;
pub mod price;

pub use journal::*;
pub use options::*;
pub use price::*;
