//! # base3-container
//!
//! The service container of the Base3 adapter and the capability discovery
//! built on top of it. Provides:
//!
//! - Instance, factory, shared-factory and alias bindings
//! - Transitive alias resolution with a hop bound
//! - A weakly held host registry consulted for unbound identifiers
//! - An explicit class table and the per-bootstrap `ClassMap` that
//!   instantiates capability implementations through the container

pub mod binding;
pub mod classmap;
pub mod container;
pub mod ids;

pub use binding::{Binding, BindingKind, FactoryFn};
pub use classmap::{ClassMap, ClassTable, ClassTableBuilder, InstanceCriteria};
pub use container::Container;
