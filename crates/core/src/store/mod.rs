mod error;
mod serialization;
mod traits;
mod validation;

pub use error::{Result, StoreError};
pub use serialization::{deserialize_value, serialize_value};
pub use traits::{Store, StoreExt};
pub use validation::validate_key;
