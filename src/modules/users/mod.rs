pub mod model;
pub mod tokens;

pub use model::{DataportenUser, RequestUser};
pub use tokens::{InMemoryTokenStore, TokenResolver};
