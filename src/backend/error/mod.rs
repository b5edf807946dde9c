//! Backend Error Module
//!
//! Error types returned by every HTTP handler and their conversion into
//! uniform JSON responses of the form `{ "message": "..." }`.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse and extractor rejection mapping
//! ```
//!
//! # Status Mapping
//!
//! | Variant | Status |
//! |---|---|
//! | `Validation`, `Shared` | 400 |
//! | `Unauthenticated`, `Unauthorized` | 401 |
//! | `NotFound` | 404 |
//! | `Internal` | 500 |
//! | `Store` | depends on the store error |

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use conversion::parse_id;
pub use types::BackendError;
