//! beanforge: compiled converters between Rust structs and by-name
//! property sources and sinks.
//!
//! A type describes its members once (usually with `#[derive(Describe)]`),
//! the compiler turns that description into a cached [`Converter`], and the
//! converter then creates, fills and extracts instances without any
//! per-call member lookup.
//!
//! ```rust
//! # #[cfg(feature = "derive")] {
//! use std::collections::BTreeMap;
//! use beanforge::{compile, Describe, Value};
//!
//! #[derive(Describe, Default)]
//! #[bean(crate = "beanforge")]
//! #[bean(default)]
//! pub struct User {
//!     pub name: String,
//!     pub age: i32,
//! }
//!
//! let converter = compile::<User>().unwrap();
//! let mut source = BTreeMap::from([
//!     ("name".to_string(), Value::from("John")),
//!     ("age".to_string(), Value::from(20)),
//! ]);
//! let user = converter.create_from(&mut source).unwrap().unwrap();
//! assert_eq!(user.age, 20);
//! # }
//! ```

pub use beanforge_core::*;

pub use beanforge_compiler::{
    compile, compile_descriptor, compile_with, link, property_name, resolve_name, AccessPolicy,
    Artifact, ArtifactLoader, AttributeResolver, ConstructorSpec, Converter, ConverterCache,
    DefaultResolver, ErasedConverter, FnResolver, MethodRole, NameResolver, ResolverId, StepSpec,
};

#[cfg(feature = "derive")]
pub use beanforge_derive::Describe;

#[cfg(feature = "json")]
pub use beanforge_json as json;
