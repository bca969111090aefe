// Leaf components: JSON view, date codec, field maps, and the model object contract.
pub mod date;
pub mod error;
pub mod field_map;
pub mod json;
pub mod object;
