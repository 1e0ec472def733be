#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
extern crate alloc;
mod actor;
mod broadcast;
mod config;
mod error;
mod hooks;
mod pool;
mod spawner;
mod storage;
mod world;

pub use actor::*;
pub use broadcast::*;
pub use config::*;
pub use error::*;
pub use hooks::*;
pub use pool::*;
pub use spawner::*;
pub use storage::*;
pub use world::*;
