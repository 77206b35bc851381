//! Converter cache: at most one synthesis per type and resolver.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use beanforge_core::{Describe, Error};

use crate::artifact::Artifact;
use crate::converter::Converter;
use crate::loader::ArtifactLoader;
use crate::resolver::{NameResolver, ResolverId};
use crate::synth;

type Key = (TypeId, ResolverId);
type Entry = Arc<Mutex<Option<Arc<dyn Any + Send + Sync>>>>;

lazy_static! {
    static ref GLOBAL: ConverterCache = ConverterCache::new();
}

pub(crate) fn poisoned<G>(e: PoisonError<G>) -> Error {
    Error::Poisoned {
        message: e.to_string(),
    }
}

/// Caches converters by `(type, resolver id)`.
///
/// Every key owns its own lock: concurrent requests for the same key wait
/// for a single synthesis and share its result, requests for other keys
/// proceed independently. Failed syntheses are not cached.
#[derive(Default)]
pub struct ConverterCache {
    entries: Mutex<HashMap<Key, Entry>>,
    loader: ArtifactLoader,
    syntheses: AtomicUsize,
}

impl ConverterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by `compile` and `compile_with`.
    pub fn global() -> &'static ConverterCache {
        &GLOBAL
    }

    /// The converter for `T` under `resolver`, synthesizing it on first use.
    pub fn get_or_compile<T: Describe>(
        &self,
        resolver: &dyn NameResolver,
    ) -> Result<Arc<Converter<T>>, Error> {
        let entry = self.entry::<T>(resolver.id())?;
        let mut slot = entry.lock().map_err(poisoned)?;

        if let Some(existing) = slot.as_ref() {
            log::trace!("converter cache hit for {}", std::any::type_name::<T>());
            let converter = downcast::<T>(existing.clone())?;
            #[cfg(debug_assertions)]
            same_mapping(&converter, resolver)?;
            return Ok(converter);
        }

        log::debug!(
            "compiling converter for {} with resolver '{}'",
            std::any::type_name::<T>(),
            resolver.id()
        );
        let converter = Arc::new(self.synthesize::<T>(resolver)?);
        *slot = Some(converter.clone() as Arc<dyn Any + Send + Sync>);
        Ok(converter)
    }

    /// Install a precompiled artifact as the converter for `T` under the
    /// resolver id recorded in it.
    ///
    /// The artifact is defined in the cache's loader first, so an artifact
    /// whose name is already taken by different content is rejected. When
    /// the key already holds a converter, that converter is returned.
    pub fn install<T: Describe>(&self, bytes: &[u8]) -> Result<Arc<Converter<T>>, Error> {
        let artifact = Artifact::from_bytes(bytes)?;
        let entry = self.entry::<T>(ResolverId::new(artifact.resolver.clone()))?;
        let mut slot = entry.lock().map_err(poisoned)?;

        let artifact = self.loader.define(artifact)?;
        if let Some(existing) = slot.as_ref() {
            return downcast::<T>(existing.clone());
        }

        let converter = Arc::new(synth::realize(T::describe(), artifact)?);
        log::debug!("installed converter {}", converter.name());
        *slot = Some(converter.clone() as Arc<dyn Any + Send + Sync>);
        Ok(converter)
    }

    /// Number of converters synthesized by this cache so far.
    pub fn syntheses(&self) -> usize {
        self.syntheses.load(Ordering::SeqCst)
    }

    /// Number of cached converters.
    pub fn len(&self) -> usize {
        let slots: Vec<Entry> = match self.entries.lock() {
            Ok(entries) => entries.values().cloned().collect(),
            Err(_) => return 0,
        };
        // the map lock is released before any slot is inspected
        slots
            .iter()
            .filter(|entry| entry.lock().map(|slot| slot.is_some()).unwrap_or(false))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn loader(&self) -> &ArtifactLoader {
        &self.loader
    }

    fn entry<T: 'static>(&self, resolver: ResolverId) -> Result<Entry, Error> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries
            .entry((TypeId::of::<T>(), resolver))
            .or_default()
            .clone())
    }

    fn synthesize<T: Describe>(&self, resolver: &dyn NameResolver) -> Result<Converter<T>, Error> {
        let descriptor = T::describe();
        let id = resolver.id();
        let name = Artifact::name_for(descriptor.type_path(), id.as_str(), id.is_default());

        let artifact = synth::plan(&descriptor, resolver, name)?;
        let converter = synth::realize(descriptor, artifact)?;
        self.loader.define(converter.artifact().clone())?;

        self.syntheses.fetch_add(1, Ordering::SeqCst);
        log::debug!(
            "synthesized {} (fill: {}, extract: {})",
            converter.name(),
            converter.artifact().fill.len(),
            converter.artifact().extract.len()
        );
        Ok(converter)
    }
}

/// Resolvers sharing an id must map a type identically. Debug builds plan
/// the requesting resolver again on every hit and report a divergence as a
/// conflict on the cached artifact's name.
#[cfg(debug_assertions)]
fn same_mapping<T: Describe>(converter: &Converter<T>, resolver: &dyn NameResolver) -> Result<(), Error> {
    let cached = converter.artifact();
    let planned = synth::plan(&T::describe(), resolver, cached.name.clone())?;
    if planned.fill != cached.fill
        || planned.extract != cached.extract
        || planned.constructor != cached.constructor
    {
        log::error!(
            "resolver '{}' maps {} differently from the cached {}",
            resolver.id(),
            cached.type_path,
            cached.name
        );
        return Err(Error::ArtifactConflict {
            name: cached.name.clone(),
        });
    }
    Ok(())
}

fn downcast<T: 'static>(converter: Arc<dyn Any + Send + Sync>) -> Result<Arc<Converter<T>>, Error> {
    converter
        .downcast::<Converter<T>>()
        .map_err(|_| Error::InstanceType {
            expected: std::any::type_name::<T>().to_string(),
        })
}
