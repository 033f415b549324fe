pub mod airport;
pub mod demand;
pub mod flight;
pub mod route;

pub use airport::*;
pub use demand::*;
pub use flight::*;
pub use route::*;
