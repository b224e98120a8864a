//! The collection of implemented algorithms.

pub mod local_search;

pub use local_search::{InitialDesign, LocalSearch, LocalSearchBuilder, LocalSearchOptions};
