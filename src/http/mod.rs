//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → route.rs / itinerary.rs / map.rs / health.rs (handlers)
//!     → response.rs (RouteResult / RouteError → HTTP)
//!     → Send to client
//! ```

pub mod health;
pub mod itinerary;
pub mod map;
pub mod request;
pub mod response;
pub mod route;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::{AppState, HttpServer, ServerBuildError};
