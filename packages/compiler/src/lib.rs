//! The beanforge converter compiler.
//!
//! Given a type's [`StructureDescriptor`](beanforge_core::StructureDescriptor)
//! and a [`NameResolver`], the compiler selects and names the mappable
//! members, specializes one access step per member and direction, and
//! returns a [`Converter`] with three operations:
//!
//! - `create`: a new instance from the constructor with the fewest parameters
//! - `fill`: write the instance's members from a `PropertySource`
//! - `extract`: read the instance's members into a `PropertySink`
//!
//! Converters are cached per type and resolver; concurrent requests share
//! one synthesis.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use beanforge_compiler::compile;
//! use beanforge_core::{Constructor, Describe, Member, StructureDescriptor, Value};
//!
//! #[derive(Default)]
//! struct Account {
//!     owner: String,
//!     balance: i64,
//! }
//!
//! impl Describe for Account {
//!     fn describe() -> StructureDescriptor<Self> {
//!         StructureDescriptor::<Account>::new("Account")
//!             .constructor(Constructor::default_of())
//!             .member(Member::string_field(
//!                 "owner",
//!                 |a: &Account| a.owner.as_str(),
//!                 |a: &mut Account, v| a.owner = v,
//!             ))
//!             .member(Member::getter::<i64>("getBalance", |a: &Account| a.balance))
//!             .member(Member::setter::<i64>("setBalance", |a: &mut Account, v| a.balance = v))
//!     }
//! }
//!
//! let converter = compile::<Account>().unwrap();
//! let mut source = BTreeMap::from([
//!     ("owner".to_string(), Value::from("ada")),
//!     ("balance".to_string(), Value::from(10i64)),
//! ]);
//! let account = converter.create_from(&mut source).unwrap().unwrap();
//! assert_eq!(account.balance, 10);
//! assert_eq!(converter.to_map(&account).unwrap(), source);
//! ```

use std::sync::Arc;

use bytes::Bytes;

use beanforge_core::{Describe, Error};

mod artifact;
mod cache;
mod converter;
mod loader;
mod resolver;
mod synth;

pub use artifact::{Artifact, ConstructorSpec, StepSpec};
pub use cache::ConverterCache;
pub use converter::{Converter, ErasedConverter};
pub use loader::ArtifactLoader;
pub use resolver::{
    property_name, resolve_name, AccessPolicy, AttributeResolver, DefaultResolver, FnResolver,
    MethodRole, NameResolver, ResolverId,
};

/// The converter for `T` under the default resolver, from the global cache.
pub fn compile<T: Describe>() -> Result<Arc<Converter<T>>, Error> {
    ConverterCache::global().get_or_compile::<T>(&DefaultResolver)
}

/// The converter for `T` under `resolver`, from the global cache.
pub fn compile_with<T: Describe>(resolver: &dyn NameResolver) -> Result<Arc<Converter<T>>, Error> {
    ConverterCache::global().get_or_compile::<T>(resolver)
}

/// Compile `T` to a serialized artifact named `name` without defining or
/// caching it anywhere. See [`link`].
pub fn compile_descriptor<T: Describe>(name: &str, resolver: &dyn NameResolver) -> Result<Bytes, Error> {
    let descriptor = T::describe();
    synth::plan(&descriptor, resolver, name.to_string())?.to_bytes()
}

/// Build a converter from a serialized artifact, checking every recorded
/// member against `T`'s descriptor.
pub fn link<T: Describe>(artifact: &[u8]) -> Result<Converter<T>, Error> {
    synth::realize(T::describe(), Artifact::from_bytes(artifact)?)
}
