#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod crypto;
pub mod token;
