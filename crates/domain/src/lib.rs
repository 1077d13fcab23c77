//! SkillAPI Editor Domain
//!
//! Field descriptors, the class and skill entities built from them, the
//! per-kind registries, and the save format they are written in. Nothing
//! here knows about a concrete UI: forms go through [`FieldView`].

pub mod attributes;
pub mod class;
pub mod component;
pub mod entity;
pub mod error;
pub mod field;
pub mod registry;
pub mod save_format;
pub mod skill;
pub mod view;

pub use attributes::{AttributeNames, DEFAULT_ATTRIBUTES};
pub use class::{Class, ATTRIBUTE_DROP_HINT, EXP_SOURCES};
pub use component::{Component, ComponentKind, KeyAllocator};
pub use entity::{Entity, FormContext, LoadOutcome};
pub use error::DomainError;
pub use field::{Field, FieldValue, OptionSource};
pub use registry::{Registry, UpdateOutcome};
pub use save_format::Mapping;
pub use skill::{Skill, LEGACY_MARKERS};
pub use view::{
    ControlId, ControlKind, ControlSpec, ControlState, FieldView, FormAction, FormBuffer, FormItem,
    Section,
};
