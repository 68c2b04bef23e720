//! The order intake pipeline: normalize, resolve, submit.

pub mod normalize;
pub mod resolve;
pub mod submit;
