pub mod constants;
pub mod tuple_range;

pub use tuple_range::{
    TupleRange,
    TupleRangeError,
};
