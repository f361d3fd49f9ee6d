//! Data access, one module per table.
//!
//! Repositories own the integrity rules that need the database: uniqueness,
//! reference existence, protected deletes and cascades. Every write runs in
//! its own transaction.

pub mod breed;
pub mod caretaker;
pub mod dog;
pub mod vaccination;
pub mod vaccine;

use sea_orm::prelude::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::extension::sqlite::SqliteExpr;
use sea_orm::sea_query::{Func, IntoColumnRef, LikeExpr};
use sea_orm::{Condition, DbBackend, DbErr, ExprTrait, SqlErr};

use crate::error::AppError;
use crate::models::form::FormErrors;
use crate::models::shared::{escape_like, glob_contains};

/// Case-insensitive substring match on `col`. Wildcards in `term` match literally.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so there the match is a
/// GLOB whose letters carry both case forms. Postgres uses `ILIKE`.
pub fn icontains<C: IntoColumnRef>(backend: DbBackend, col: C, term: &str) -> Condition {
    let like = |term: &str| LikeExpr::new(format!("%{}%", escape_like(term))).escape('\\');
    let matches = match backend {
        DbBackend::Sqlite => Expr::col(col).glob(glob_contains(term)),
        DbBackend::Postgres => Expr::col(col).ilike(like(term)),
        _ => Expr::expr(Func::lower(Expr::col(col))).like(like(&term.to_lowercase())),
    };
    Condition::all().add(matches)
}

/// Map a unique-constraint violation raised by a write to the same field error
/// the pre-check produces.
pub fn unique_violation(err: DbErr, field: &str, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Unique constraint caught on write to {}", field);
            FormErrors::single(field, message)
        }
        _ => AppError::from(err),
    }
}
