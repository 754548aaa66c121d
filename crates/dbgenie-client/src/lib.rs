//! Client side of the dbgenie generation service.
//!
//! [`GenerationService`] is the seam the editor talks to;
//! [`HttpGenerationService`] implements it over HTTP.

pub mod error;
pub mod http;
pub mod service;

pub use error::{ClientError, ClientResult, SessionCallError};
pub use http::{DEFAULT_TIMEOUT, HttpGenerationService};
pub use service::{GenerationService, run_generation, run_suggestion};
