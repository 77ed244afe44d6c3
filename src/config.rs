//! JSON configuration of the command-line tools.

pub mod sliding_fit_demo;
