//! Generic REST layer: query parsing, the resource facade, one method per HTTP verb
//! and the response handler.

pub mod controller;
pub mod criteria;
pub mod error;
pub mod methods;
pub mod request_handler;
pub mod resource;
pub mod response_handler;
pub mod routes;

pub use controller::RestController;
pub use error::RestError;
pub use request_handler::RestRequest;
pub use resource::{EntityListener, ReferenceResolver, Resource};
pub use response_handler::ResponseHandler;
pub use routes::{read_only_routes, rest_routes};
