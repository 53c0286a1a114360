//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod categoria;
pub mod producto;
pub mod payload;
pub mod pagination;

pub use validation::{FieldViolation, ValidationError, ValidationErrors};
pub use categoria::Categoria;
pub use producto::{Nombre, PrecioUnitario, Sku, Stock};
pub use payload::{NewProducto, ProductoChanges, ProductoPayload};
pub use pagination::{Pagination, Paginated, PaginationParams};
