//! Authentication Module
//!
//! User registration, login and session tokens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT token management
//! ├── passwords.rs    - bcrypt hashing off the async workers
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types and validation
//!     ├── register.rs - User registration handler
//!     ├── login.rs    - User authentication handler
//!     └── me.rs       - Get current user handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: name, email, password, birthdate → user created → JWT returned
//! 2. **Login**: email and password → credentials verified → JWT returned
//! 3. **Me**: JWT → user resolved by the access gate → user returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs naming the user id, expiring after 30 days
//! - Failed logins do not reveal whether the email exists

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod passwords;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};
pub use handlers::{get_me, login, register};
pub use sessions::TokenKeys;
