//! Core abstractions and types for askopt.
//!
//! *Users* are mainly interested in describing the search space with
//! [`BoundsConfig`] and providing an [`Objective`].
//!
//! Algorithm *developers* are interested in implementing the [`AskTell`] trait
//! and using the tools in the [history](crate::history) and
//! [analysis](crate::analysis) modules.

mod ask_tell;
mod bounds;
mod builder;
mod dimension;
mod error;
mod objective;
mod transform;

pub use ask_tell::*;
pub use bounds::*;
pub use builder::*;
pub use dimension::*;
pub use error::*;
pub use objective::*;
pub use transform::*;
