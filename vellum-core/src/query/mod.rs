//! Query language shared by the resolver and storage backends

pub mod filter;
pub mod options;

pub use filter::{FilterError, Operator, Where};
pub use options::{PaginatedDocs, QueryOptions, Sort, SortDirection};
