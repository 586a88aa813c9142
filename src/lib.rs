#![doc = include_str!("../README.md")]

pub mod error;
#[cfg(feature = "future")]
pub mod future;
pub mod mapper;
pub mod prelude;
#[cfg(feature = "slice")]
pub mod slice;
mod utils;

#[cfg(feature = "future")]
pub extern crate futures;
pub extern crate rayon;
