mod user;

use sqlx::{Postgres, Transaction};
pub use user::*;

pub type PgTransaction = Transaction<'static, Postgres>;
