#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod attributes;
pub mod builder;
pub mod config;
pub mod error;
pub mod hot;
pub mod manifest;
pub mod resolvers;
pub mod tags;
pub mod util;
pub mod vite;

pub use attributes::{AttributeValue, TagAttributes};
pub use builder::ViteBuilder;
pub use config::ViteOptions;
pub use error::{Result, ViteError};
pub use hot::HotFile;
pub use manifest::{Chunk, Manifest};
pub use resolvers::{AssetContext, AttributeResolver, PathResolver};
pub use vite::Vite;
