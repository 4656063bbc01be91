//! appcontainer - Application Component Container
//!
//! Builds a registry of live components from an explicit, ordered list of
//! configuration sources and resolves them by name or by type.

pub mod cli;
pub mod component;
pub mod config;
pub mod container;
pub mod error;
pub mod producer;
pub mod source;
pub mod web;

pub use component::{ComponentId, Instance, TypeKey};
pub use config::Config;
pub use container::{Container, ContainerBuilder, PlannedComponent};
pub use error::ContainerError;
pub use producer::{ComponentProducer, Dependencies};
pub use source::ConfigurationSource;
