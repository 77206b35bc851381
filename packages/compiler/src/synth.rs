//! Converter synthesis.
//!
//! Synthesis runs in two stages. `plan` selects and names the members of a
//! descriptor through a resolver and records the outcome as an [`Artifact`].
//! `realize` turns an artifact back into a converter by specializing one
//! step per member per direction against the descriptor's typed handles.
//! The type dispatch happens here, once; converters never branch on the
//! value type again.

use std::collections::HashSet;

use beanforge_core::{
    Error, Member, MemberKind, Primitive, PropertySink, PropertySource, Slot, StructureDescriptor,
};

use crate::artifact::{Artifact, ConstructorSpec, StepSpec};
use crate::converter::{Converter, ExtractStep, FillStep};
use crate::resolver::{resolve_name, AccessPolicy, NameResolver};

/// Select, name and validate the members of `descriptor`.
pub(crate) fn plan<T: 'static>(
    descriptor: &StructureDescriptor<T>,
    resolver: &dyn NameResolver,
    name: String,
) -> Result<Artifact, Error> {
    let resolver_id = resolver.id();
    let mut fill = Vec::new();
    let mut extract = Vec::new();

    for (index, member) in descriptor.members().iter().enumerate() {
        let info = member.info();
        if info.is_static() {
            log::trace!(
                "{}: static member '{}' is never mapped",
                descriptor.type_name(),
                info.declared_name()
            );
            continue;
        }

        let Some(property) = resolve_name(resolver, info) else {
            log::trace!(
                "{}: resolver '{}' skipped '{}'",
                descriptor.type_name(),
                resolver_id,
                info.declared_name()
            );
            continue;
        };

        let forced = !info.is_public();
        if forced {
            match resolver.access() {
                AccessPolicy::PublicOnly => {
                    return Err(Error::AccessDenied {
                        type_name: descriptor.type_name().to_string(),
                        member: info.declared_name().to_string(),
                        resolver: resolver_id.to_string(),
                    });
                }
                AccessPolicy::ForceNonPublic => {
                    log::debug!(
                        "{}: forcing access to non-public member '{}' as '{}'",
                        descriptor.type_name(),
                        info.declared_name(),
                        property
                    );
                }
            }
        }

        check_member(descriptor.type_name(), member)?;

        let step = StepSpec {
            index,
            property,
            member: info.declared_name().to_string(),
            kind: info.kind(),
            value_type: info.value_type().clone(),
            forced,
        };
        if info.kind().can_fill() {
            fill.push(step.clone());
        }
        if info.kind().can_extract() {
            extract.push(step);
        }
    }

    warn_duplicates(descriptor.type_name(), "fill", &fill);
    warn_duplicates(descriptor.type_name(), "extract", &extract);

    // Fewest parameters wins; min_by_key keeps the first of equal arities.
    let constructor = descriptor
        .constructors()
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.arity())
        .map(|(index, c)| ConstructorSpec {
            index,
            parameter_types: c.parameter_types().to_vec(),
        });

    Ok(Artifact {
        name,
        type_path: descriptor.type_path().to_string(),
        resolver: resolver_id.to_string(),
        constructor,
        fill,
        extract,
    })
}

fn warn_duplicates(type_name: &str, direction: &str, steps: &[StepSpec]) {
    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.property.as_str()) {
            log::warn!(
                "{}: property '{}' is mapped more than once for {}, '{}' runs last",
                type_name,
                step.property,
                direction,
                step.member
            );
        }
    }
}

/// Reject members whose handles disagree with their declared kind or type.
fn check_member<T: 'static>(type_name: &str, member: &Member<T>) -> Result<(), Error> {
    let info = member.info();
    let slot = member.slot();

    let problem = if slot.value_type() != *info.value_type() {
        Some(format!(
            "declared as {} but its handles operate on {}",
            info.value_type(),
            slot.value_type()
        ))
    } else {
        match info.kind() {
            MemberKind::Field if !(slot.has_get() && slot.has_set()) => {
                Some("a field needs both a read and a write handle".to_string())
            }
            MemberKind::Getter if !slot.has_get() => {
                Some("a getter has no read handle".to_string())
            }
            MemberKind::Setter if !slot.has_set() => {
                Some("a setter has no write handle".to_string())
            }
            _ => None,
        }
    };

    match problem {
        Some(message) => {
            log::error!("{}: malformed member '{}': {}", type_name, info.declared_name(), message);
            Err(Error::MalformedMember {
                type_name: type_name.to_string(),
                member: info.declared_name().to_string(),
                message,
            })
        }
        None => Ok(()),
    }
}

/// Build the converter an artifact describes.
pub(crate) fn realize<T: 'static>(
    descriptor: StructureDescriptor<T>,
    artifact: Artifact,
) -> Result<Converter<T>, Error> {
    let type_name = descriptor.type_name().to_string();
    let mismatch = |message: String| Error::ArtifactMismatch {
        name: artifact.name.clone(),
        type_name: type_name.clone(),
        message,
    };

    if artifact.type_path != descriptor.type_path() {
        return Err(mismatch(format!(
            "built for {}, linked against {}",
            artifact.type_path,
            descriptor.type_path()
        )));
    }

    let constructor = match &artifact.constructor {
        None => None,
        Some(spec) => {
            let constructor = descriptor
                .constructors()
                .get(spec.index)
                .filter(|c| c.parameter_types() == spec.parameter_types.as_slice())
                .ok_or_else(|| mismatch(format!("no constructor #{} with matching parameters", spec.index)))?;
            Some(constructor.clone())
        }
    };

    let mut fill = Vec::with_capacity(artifact.fill.len());
    for step in &artifact.fill {
        let member = step_member(&descriptor, step).map_err(&mismatch)?;
        check_member(&type_name, member)?;
        fill.push(fill_step(member.slot(), step.property.clone()).ok_or_else(|| {
            mismatch(format!("member '{}' cannot be written", step.member))
        })?);
    }

    let mut extract = Vec::with_capacity(artifact.extract.len());
    for step in &artifact.extract {
        let member = step_member(&descriptor, step).map_err(&mismatch)?;
        check_member(&type_name, member)?;
        extract.push(extract_step(member.slot(), step.property.clone()).ok_or_else(|| {
            mismatch(format!("member '{}' cannot be read", step.member))
        })?);
    }

    log::debug!(
        "realized {} for {} ({} fill, {} extract)",
        artifact.name,
        type_name,
        fill.len(),
        extract.len()
    );

    Ok(Converter::new(type_name, artifact, constructor, fill, extract))
}

fn step_member<'d, T: 'static>(
    descriptor: &'d StructureDescriptor<T>,
    step: &StepSpec,
) -> Result<&'d Member<T>, String> {
    let member = descriptor
        .members()
        .get(step.index)
        .ok_or_else(|| format!("no member #{} ('{}')", step.index, step.member))?;
    let info = member.info();
    if info.declared_name() != step.member || info.kind() != step.kind {
        return Err(format!(
            "member #{} is {:?} '{}', expected {:?} '{}'",
            step.index,
            info.kind(),
            info.declared_name(),
            step.kind,
            step.member
        ));
    }
    if *info.value_type() != step.value_type {
        return Err(format!(
            "member '{}' is {}, expected {}",
            step.member,
            info.value_type(),
            step.value_type
        ));
    }
    Ok(member)
}

fn primitive_fill<T: 'static, V: Primitive>(set: fn(&mut T, V), property: String) -> FillStep<T> {
    Box::new(move |instance: &mut T, source: &mut dyn PropertySource| {
        let value = V::read(source, &property)?;
        set(instance, value);
        Ok(())
    })
}

fn primitive_extract<T: 'static, V: Primitive>(get: fn(&T) -> V, property: String) -> ExtractStep<T> {
    Box::new(move |instance: &T, sink: &mut dyn PropertySink| get(instance).write(sink, &property))
}

/// The write step of a member: one typed source read, one store.
fn fill_step<T: 'static>(slot: &Slot<T>, property: String) -> Option<FillStep<T>> {
    let step: FillStep<T> = match slot.clone() {
        Slot::I8(h) => primitive_fill(h.set?, property),
        Slot::I16(h) => primitive_fill(h.set?, property),
        Slot::I32(h) => primitive_fill(h.set?, property),
        Slot::I64(h) => primitive_fill(h.set?, property),
        Slot::F32(h) => primitive_fill(h.set?, property),
        Slot::F64(h) => primitive_fill(h.set?, property),
        Slot::Bool(h) => primitive_fill(h.set?, property),
        Slot::Char(h) => primitive_fill(h.set?, property),
        Slot::String(h) => {
            let set = h.set?;
            Box::new(move |instance: &mut T, source: &mut dyn PropertySource| {
                let value = source.get_string(&property)?;
                set(instance, value);
                Ok(())
            })
        }
        Slot::Value(h) => {
            let set = h.set?;
            Box::new(move |instance: &mut T, source: &mut dyn PropertySource| {
                let value = source.get_object(&property)?;
                set(instance, value);
                Ok(())
            })
        }
        Slot::Object(h) => {
            let set = h.set?;
            let type_name = h.type_name;
            Box::new(move |instance: &mut T, source: &mut dyn PropertySource| {
                let value = source.get_object(&property)?;
                let found = value.kind();
                set(instance, value).map_err(|e| match e {
                    Error::Decode { message } => {
                        Error::conversion(property.as_str(), &*type_name, format!("{} ({})", found, message))
                    }
                    other => other,
                })
            })
        }
    };
    Some(step)
}

/// The read step of a member: one load, one typed sink write.
fn extract_step<T: 'static>(slot: &Slot<T>, property: String) -> Option<ExtractStep<T>> {
    let step: ExtractStep<T> = match slot.clone() {
        Slot::I8(h) => primitive_extract(h.get?, property),
        Slot::I16(h) => primitive_extract(h.get?, property),
        Slot::I32(h) => primitive_extract(h.get?, property),
        Slot::I64(h) => primitive_extract(h.get?, property),
        Slot::F32(h) => primitive_extract(h.get?, property),
        Slot::F64(h) => primitive_extract(h.get?, property),
        Slot::Bool(h) => primitive_extract(h.get?, property),
        Slot::Char(h) => primitive_extract(h.get?, property),
        Slot::String(h) => {
            let get = h.get?;
            Box::new(move |instance: &T, sink: &mut dyn PropertySink| {
                sink.set_string(&property, get(instance))
            })
        }
        Slot::Value(h) => {
            let get = h.get?;
            Box::new(move |instance: &T, sink: &mut dyn PropertySink| {
                sink.set_object(&property, get(instance).clone())
            })
        }
        Slot::Object(h) => {
            let get = h.get?;
            Box::new(move |instance: &T, sink: &mut dyn PropertySink| {
                let value = get(instance)?;
                sink.set_object(&property, value)
            })
        }
    };
    Some(step)
}
