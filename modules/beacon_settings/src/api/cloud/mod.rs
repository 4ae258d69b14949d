//! Cloud dictionary mapping of device settings

pub mod codec;
pub mod dto;
pub mod mapper;

pub use codec::DecodeSkip;
