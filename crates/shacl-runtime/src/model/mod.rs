//! Data model types.
//!
//! - Paths and compaction contexts
//! - Properties and references (typed value containers)
//! - Type descriptors and the registry that builds them
//! - Objects and the document-level object set

pub mod context;
pub mod descriptor;
pub mod object;
pub mod object_set;
pub mod path;
pub mod property;
pub mod reference;
pub mod registry;
pub mod slot;

pub use context::Context;
pub use descriptor::{NodeKind, PropertyDescriptor, TypeDescriptor, ValueKind};
pub use object::{AnyValue, ShaclObject};
pub use object_set::ObjectSet;
pub use path::{Path, Segment};
pub use property::{ListProperty, Property, RefListProperty, RefProperty, Visit, Walkable};
pub use reference::Ref;
pub use registry::{Constraint, PropertyDef, Registry, RegistryBuilder, TypeDef};
pub use slot::{Slot, SlotValue};
