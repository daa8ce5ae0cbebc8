mod health_check;
mod users;

pub use health_check::*;
pub use users::*;
