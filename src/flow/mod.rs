pub mod activity;
pub mod data;
pub mod definition;

pub use activity::*;
pub use data::*;
pub use definition::*;
