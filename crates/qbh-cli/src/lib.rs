//! Command-line front end for the humming matcher

pub mod output;
