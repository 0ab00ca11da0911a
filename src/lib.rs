#![doc = include_str!("../README.md")]

#[cfg(test)]
mod convert_test;
#[cfg(test)]
mod kind_test;
#[cfg(test)]
mod options_test;
#[cfg(test)]
mod transfer_test;

pub mod buffer;
pub mod closeable;
pub mod converters;
pub mod driver;
pub mod error;
pub mod fabric;
pub mod kind;
pub mod many;
pub mod options;
pub mod planner;
mod pump;
pub mod reader;
pub mod registry;
pub mod sink;
pub mod source;
pub mod value;

pub use buffer::*;
pub use closeable::*;
pub use converters::text::LineStream;
pub use error::*;
pub use fabric::*;
pub use kind::*;
pub use many::*;
pub use options::*;
pub use planner::*;
pub use reader::*;
pub use registry::*;
pub use sink::*;
pub use source::*;
pub use value::*;
