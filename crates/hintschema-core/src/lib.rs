pub mod config;
pub mod descriptor;
pub mod docstring;
pub mod error;
pub mod manifest;
pub mod resolve;
pub mod schema;
pub mod signature;

pub use descriptor::TypeDescriptor;
pub use error::IncompatibleTypesError;
pub use resolve::{Resolver, ResolverOptions};
pub use schema::{DefaultValue, Schema};
pub use signature::FunctionAnnotation;
