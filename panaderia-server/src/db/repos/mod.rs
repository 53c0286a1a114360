//! Repository implementations for database access
//!
//! Repositories borrow the pool and issue parameterized statements:
//! - Rely on DB constraints, handle conflicts (no check-then-insert)
//! - Missing rows surface as `DbError::NotFound`

pub mod productos;

pub use productos::{DbError, Producto, ProductoFilter, ProductoRepo};
