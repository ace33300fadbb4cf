pub mod rule;
pub mod catalog;
pub mod graph;
pub mod explanation;
pub mod session;

pub use rule::*;
pub use graph::*;
pub use explanation::*;
pub use session::*;
