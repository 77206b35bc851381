//! Compiled converters.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use beanforge_core::{Arguments, Constructor, Error, PropertySink, PropertySource, Value};

use crate::artifact::Artifact;

pub(crate) type FillStep<T> =
    Box<dyn Fn(&mut T, &mut dyn PropertySource) -> Result<(), Error> + Send + Sync>;
pub(crate) type ExtractStep<T> =
    Box<dyn Fn(&T, &mut dyn PropertySink) -> Result<(), Error> + Send + Sync>;

/// A converter between `T` and the property protocol.
///
/// Each member access was specialized once, when the converter was built;
/// calls run the prepared steps in declaration order and take no locks.
pub struct Converter<T> {
    type_name: String,
    artifact: Artifact,
    constructor: Option<Constructor<T>>,
    fill: Vec<FillStep<T>>,
    extract: Vec<ExtractStep<T>>,
}

impl<T> Converter<T> {
    pub(crate) fn new(
        type_name: String,
        artifact: Artifact,
        constructor: Option<Constructor<T>>,
        fill: Vec<FillStep<T>>,
        extract: Vec<ExtractStep<T>>,
    ) -> Self {
        Self {
            type_name,
            artifact,
            constructor,
            fill,
            extract,
        }
    }

    /// A new instance from the constructor with the fewest parameters, each
    /// given its zero value. `None` when the type has no constructor.
    pub fn create(&self) -> Option<T> {
        self.constructor
            .as_ref()
            .map(|c| c.invoke(&Arguments::zeroed(c.parameter_types())))
    }

    /// Write every fill-capable member from the source.
    ///
    /// Stops at the first failing member, which is left untouched; members
    /// before it have already been written.
    pub fn fill(&self, instance: &mut T, source: &mut dyn PropertySource) -> Result<(), Error> {
        for step in &self.fill {
            step(&mut *instance, &mut *source)?;
        }
        Ok(())
    }

    /// Read every extract-capable member into the sink.
    pub fn extract(&self, instance: &T, sink: &mut dyn PropertySink) -> Result<(), Error> {
        for step in &self.extract {
            step(instance, &mut *sink)?;
        }
        Ok(())
    }

    /// `create` followed by `fill`.
    pub fn create_from(&self, source: &mut dyn PropertySource) -> Result<Option<T>, Error> {
        let Some(mut instance) = self.create() else {
            return Ok(None);
        };
        self.fill(&mut instance, source)?;
        Ok(Some(instance))
    }

    pub fn to_map(&self, instance: &T) -> Result<BTreeMap<String, Value>, Error> {
        let mut map = BTreeMap::new();
        self.extract(instance, &mut map)?;
        Ok(map)
    }

    pub fn to_value(&self, instance: &T) -> Result<Value, Error> {
        self.to_map(instance).map(Value::Map)
    }

    /// Display name of the converted type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Name the converter's artifact is registered under.
    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn fill_properties(&self) -> impl Iterator<Item = &str> {
        self.artifact.fill.iter().map(|s| s.property.as_str())
    }

    pub fn extract_properties(&self) -> impl Iterator<Item = &str> {
        self.artifact.extract.iter().map(|s| s.property.as_str())
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }
}

impl<T> fmt::Debug for Converter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("type_name", &self.type_name)
            .field("name", &self.artifact.name)
            .field("fill", &self.artifact.fill.len())
            .field("extract", &self.artifact.extract.len())
            .finish()
    }
}

/// Type-erased converter surface.
///
/// Each call performs a single downcast and then runs the specialized
/// converter.
pub trait ErasedConverter: Send + Sync {
    fn type_name(&self) -> &str;

    fn create_any(&self) -> Option<Box<dyn Any>>;

    fn fill_any(&self, instance: &mut dyn Any, source: &mut dyn PropertySource) -> Result<(), Error>;

    fn extract_any(&self, instance: &dyn Any, sink: &mut dyn PropertySink) -> Result<(), Error>;
}

impl<T: 'static> ErasedConverter for Converter<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn create_any(&self) -> Option<Box<dyn Any>> {
        self.create().map(|instance| Box::new(instance) as Box<dyn Any>)
    }

    fn fill_any(&self, instance: &mut dyn Any, source: &mut dyn PropertySource) -> Result<(), Error> {
        let instance = instance
            .downcast_mut::<T>()
            .ok_or_else(|| self.instance_type())?;
        self.fill(instance, source)
    }

    fn extract_any(&self, instance: &dyn Any, sink: &mut dyn PropertySink) -> Result<(), Error> {
        let instance = instance
            .downcast_ref::<T>()
            .ok_or_else(|| self.instance_type())?;
        self.extract(instance, sink)
    }
}

impl<T> Converter<T> {
    fn instance_type(&self) -> Error {
        Error::InstanceType {
            expected: self.type_name.clone(),
        }
    }
}
