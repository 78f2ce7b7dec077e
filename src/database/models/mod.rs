pub mod category;
pub mod organization;
pub mod product;
pub mod user;

pub use category::*;
pub use organization::*;
pub use product::*;
pub use user::*;
