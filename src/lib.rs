#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod hook;

#[doc(inline)]
pub use crate::config::{ConnectionMode, HookConfig};
#[doc(inline)]
pub use crate::entry::{Entry, Level};
#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use crate::format::MessageFormat;
#[doc(inline)]
pub use crate::hook::{Hook, RedisHook};
