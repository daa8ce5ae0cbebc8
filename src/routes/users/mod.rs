mod register;
mod routes;

pub use register::*;
pub use routes::*;
