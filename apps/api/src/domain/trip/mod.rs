pub mod value_objects;

pub use value_objects::{Destination, RunInputs, TripDates, ValidationError};
