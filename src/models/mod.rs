pub mod audit;
pub mod request;
pub mod response;

pub use audit::*;
pub use request::*;
pub use response::*;
