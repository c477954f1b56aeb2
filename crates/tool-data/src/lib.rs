pub mod dataset;
pub mod error;
pub mod legacy;
pub mod lenient;
pub mod model;
pub mod price;
pub mod slug;
pub mod unified;
