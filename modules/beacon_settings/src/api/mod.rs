//! API layer - in-process client and cloud dictionary mapping

pub mod cloud;
pub mod native;
