//! Page-number pagination primitives shared by list endpoints.
//!
//! Endpoints accept a 1-based page number and a page size, slice an already
//! ordered collection, and return the slice alongside [`PageInfo`] metadata.
//! Validation of the raw inputs lives in [`PageRequest::new`] so adapters can
//! reject bad requests before any data is fetched or transformed.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, paginate};
//!
//! let request = PageRequest::new(2, 3).expect("valid request");
//! let page = paginate((1..=7).collect::<Vec<_>>(), request, 7);
//!
//! assert_eq!(page.items(), &[4, 5, 6]);
//! assert_eq!(page.pagination().total_pages(), 3);
//! assert!(page.pagination().has_next_page());
//! ```

mod envelope;
mod request;

pub use envelope::{PageInfo, Paginated, paginate};
pub use request::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PageRequest, PaginationError};
