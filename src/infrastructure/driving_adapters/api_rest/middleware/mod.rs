//! API Middleware
//!
//! Authentication and request tagging for the REST API.

pub mod auth;
pub mod request_id;

pub use auth::{AuthenticatedUser, JwtAuth};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
