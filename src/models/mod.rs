pub mod alert;
pub mod crop;
pub mod price;
pub mod recommendation;
pub mod weather;

pub use alert::*;
pub use crop::*;
pub use price::*;
pub use recommendation::*;
pub use weather::*;
