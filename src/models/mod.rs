pub mod mood;
pub mod message;
pub mod news;
pub mod todo;
pub mod user;

pub use mood::*;
pub use message::*;
pub use news::*;
pub use todo::*;
pub use user::*;
