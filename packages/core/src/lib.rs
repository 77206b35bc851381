//! Core beanforge: the data model shared by the compiler and every
//! property source or sink.
//!
//! - `Value`: the universal object type, a dynamically-typed tree
//! - `StructureDescriptor`: the mappable members and constructors of a type
//! - `PropertySource` / `PropertySink`: the accessor protocol, by-name typed
//!   getters and setters with default coercions through `Value`
//! - `Error`: the error type of the whole workspace
//!
//! Descriptors are usually produced by `#[derive(Describe)]` from the
//! `beanforge-derive` crate, but can be written by hand:
//!
//! ```rust
//! use beanforge_core::{Constructor, Describe, Member, StructureDescriptor};
//!
//! #[derive(Default)]
//! struct User {
//!     pub name: String,
//!     age: i32,
//! }
//!
//! impl Describe for User {
//!     fn describe() -> StructureDescriptor<Self> {
//!         StructureDescriptor::<User>::new("User")
//!             .constructor(Constructor::default_of())
//!             .member(Member::string_field(
//!                 "name",
//!                 |u: &User| u.name.as_str(),
//!                 |u: &mut User, v| u.name = v,
//!             ))
//!             .member(
//!                 Member::field::<i32>("age", |u: &User| u.age, |u: &mut User, v| u.age = v)
//!                     .non_public(),
//!             )
//!             .member(Member::getter::<i32>("getAge", |u: &User| u.age))
//!             .member(Member::setter::<i32>("setAge", |u: &mut User, v| u.age = v))
//!     }
//! }
//!
//! let descriptor = User::describe();
//! assert_eq!(descriptor.members().len(), 4);
//! ```

mod access;
pub mod coerce;
pub mod convert;
mod descriptor;
mod error;
mod value;

pub use access::{sink_fn, source_fn, FnSink, FnSource, PropertySink, PropertySource};
pub use descriptor::{
    Arguments, Constructor, Describe, Handles, MemberInfo, MemberKind, Member, ObjectHandles,
    Primitive, Slot, StringHandles, StructureDescriptor, ValueHandles, ValueType, Visibility,
};
pub use error::Error;
pub use value::Value;
