//! Structure descriptors: the mappable shape of a type.
//!
//! A descriptor lists the members of a struct (fields, getter methods and
//! setter methods) in declaration order, each with its declared name, value
//! type, visibility and the typed handles the compiler needs to read or
//! write it, plus the constructors `create` may choose from.
//!
//! Descriptors are produced once per compilation by [`Describe::describe`]
//! and dropped once the converter is built.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::convert::{from_value, to_value};
use crate::{Error, PropertySink, PropertySource, Value};

/// Declared value type of a member or constructor parameter.
///
/// The first nine variants each have a dedicated accessor method. `Value`
/// is the universal object type; `Object` names any other type, which
/// travels as a `Value` through a coercion guard.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
    String,
    Value,
    Object(String),
}

impl ValueType {
    pub fn name(&self) -> &str {
        match self {
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::String => "string",
            ValueType::Value => "value",
            ValueType::Object(name) => name,
        }
    }

    /// Whether the type has a dedicated typed accessor method.
    pub fn is_fast_path(&self) -> bool {
        !matches!(self, ValueType::Value | ValueType::Object(_))
    }

    /// The zero value handed to constructor parameters of this type.
    ///
    /// Strings and objects get the absent reference, `Value::Null`.
    pub fn zero(&self) -> Value {
        match self {
            ValueType::I8 | ValueType::I16 | ValueType::I32 | ValueType::I64 => Value::Integer(0),
            ValueType::F32 | ValueType::F64 => Value::Float(0.0),
            ValueType::Bool => Value::Bool(false),
            ValueType::Char => Value::String('\0'.to_string()),
            ValueType::String | ValueType::Value | ValueType::Object(_) => Value::Null,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    NonPublic,
}

/// How a member is reached on an instance.
///
/// Getter and setter methods are listed separately, each under its own
/// declared name, so an accessor pair is simply a `Getter` plus a `Setter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Getter,
    Setter,
}

impl MemberKind {
    /// Fields and setters can be written by `fill`.
    pub fn can_fill(self) -> bool {
        matches!(self, MemberKind::Field | MemberKind::Setter)
    }

    /// Fields and getters can be read by `extract`.
    pub fn can_extract(self) -> bool {
        matches!(self, MemberKind::Field | MemberKind::Getter)
    }
}

/// Typed read and write handles of a primitive member.
pub struct Handles<T, V> {
    pub get: Option<fn(&T) -> V>,
    pub set: Option<fn(&mut T, V)>,
}

impl<T, V> Clone for Handles<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Handles<T, V> {}

/// Handles of a `String` member. Reads borrow, writes take ownership.
pub struct StringHandles<T> {
    pub get: Option<fn(&T) -> &str>,
    pub set: Option<fn(&mut T, String)>,
}

impl<T> Clone for StringHandles<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StringHandles<T> {}

/// Handles of a member declared as the universal `Value` type.
pub struct ValueHandles<T> {
    pub get: Option<fn(&T) -> &Value>,
    pub set: Option<fn(&mut T, Value)>,
}

impl<T> Clone for ValueHandles<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ValueHandles<T> {}

pub type ObjectGet<T> = Arc<dyn Fn(&T) -> Result<Value, Error> + Send + Sync>;
pub type ObjectSet<T> = Arc<dyn Fn(&mut T, Value) -> Result<(), Error> + Send + Sync>;

/// Handles of an opaque object member.
///
/// `set` carries the coercion from `Value` to the declared type and fails
/// when the value has the wrong shape.
pub struct ObjectHandles<T> {
    pub type_name: Cow<'static, str>,
    pub get: Option<ObjectGet<T>>,
    pub set: Option<ObjectSet<T>>,
}

impl<T> Clone for ObjectHandles<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

/// The access handles of one member, by declared value type.
pub enum Slot<T> {
    I8(Handles<T, i8>),
    I16(Handles<T, i16>),
    I32(Handles<T, i32>),
    I64(Handles<T, i64>),
    F32(Handles<T, f32>),
    F64(Handles<T, f64>),
    Bool(Handles<T, bool>),
    Char(Handles<T, char>),
    String(StringHandles<T>),
    Value(ValueHandles<T>),
    Object(ObjectHandles<T>),
}

impl<T> Slot<T> {
    /// The value type the handles actually operate on.
    pub fn value_type(&self) -> ValueType {
        match self {
            Slot::I8(_) => ValueType::I8,
            Slot::I16(_) => ValueType::I16,
            Slot::I32(_) => ValueType::I32,
            Slot::I64(_) => ValueType::I64,
            Slot::F32(_) => ValueType::F32,
            Slot::F64(_) => ValueType::F64,
            Slot::Bool(_) => ValueType::Bool,
            Slot::Char(_) => ValueType::Char,
            Slot::String(_) => ValueType::String,
            Slot::Value(_) => ValueType::Value,
            Slot::Object(h) => ValueType::Object(h.type_name.to_string()),
        }
    }

    pub fn has_get(&self) -> bool {
        match self {
            Slot::I8(h) => h.get.is_some(),
            Slot::I16(h) => h.get.is_some(),
            Slot::I32(h) => h.get.is_some(),
            Slot::I64(h) => h.get.is_some(),
            Slot::F32(h) => h.get.is_some(),
            Slot::F64(h) => h.get.is_some(),
            Slot::Bool(h) => h.get.is_some(),
            Slot::Char(h) => h.get.is_some(),
            Slot::String(h) => h.get.is_some(),
            Slot::Value(h) => h.get.is_some(),
            Slot::Object(h) => h.get.is_some(),
        }
    }

    pub fn has_set(&self) -> bool {
        match self {
            Slot::I8(h) => h.set.is_some(),
            Slot::I16(h) => h.set.is_some(),
            Slot::I32(h) => h.set.is_some(),
            Slot::I64(h) => h.set.is_some(),
            Slot::F32(h) => h.set.is_some(),
            Slot::F64(h) => h.set.is_some(),
            Slot::Bool(h) => h.set.is_some(),
            Slot::Char(h) => h.set.is_some(),
            Slot::String(h) => h.set.is_some(),
            Slot::Value(h) => h.set.is_some(),
            Slot::Object(h) => h.set.is_some(),
        }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        match self {
            Slot::I8(h) => Slot::I8(*h),
            Slot::I16(h) => Slot::I16(*h),
            Slot::I32(h) => Slot::I32(*h),
            Slot::I64(h) => Slot::I64(*h),
            Slot::F32(h) => Slot::F32(*h),
            Slot::F64(h) => Slot::F64(*h),
            Slot::Bool(h) => Slot::Bool(*h),
            Slot::Char(h) => Slot::Char(*h),
            Slot::String(h) => Slot::String(*h),
            Slot::Value(h) => Slot::Value(*h),
            Slot::Object(h) => Slot::Object(h.clone()),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// The eight primitive types with a dedicated accessor method each.
pub trait Primitive: sealed::Sealed + Copy + Send + Sync + 'static {
    const VALUE_TYPE: ValueType;

    /// Read through the source's typed getter for this type.
    fn read(source: &mut dyn PropertySource, property: &str) -> Result<Self, Error>;

    /// Write through the sink's typed setter for this type.
    fn write(self, sink: &mut dyn PropertySink, property: &str) -> Result<(), Error>;

    fn slot<T>(handles: Handles<T, Self>) -> Slot<T>;
}

macro_rules! primitive {
    ($ty:ty, $variant:ident, $get:ident, $set:ident) => {
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn read(source: &mut dyn PropertySource, property: &str) -> Result<Self, Error> {
                source.$get(property)
            }

            fn write(self, sink: &mut dyn PropertySink, property: &str) -> Result<(), Error> {
                sink.$set(property, self)
            }

            fn slot<T>(handles: Handles<T, Self>) -> Slot<T> {
                Slot::$variant(handles)
            }
        }
    };
}

primitive!(i8, I8, get_i8, set_i8);
primitive!(i16, I16, get_i16, set_i16);
primitive!(i32, I32, get_i32, set_i32);
primitive!(i64, I64, get_i64, set_i64);
primitive!(f32, F32, get_f32, set_f32);
primitive!(f64, F64, get_f64, set_f64);
primitive!(bool, Bool, get_bool, set_bool);
primitive!(char, Char, get_char, set_char);

/// Everything about a member except its handles.
///
/// This is what name resolvers see.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberInfo {
    declared_name: Cow<'static, str>,
    value_type: ValueType,
    kind: MemberKind,
    visibility: Visibility,
    is_static: bool,
    attributes: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl MemberInfo {
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Look up an attribute (annotation) attached to the member.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }
}

/// One mappable member of `T`.
pub struct Member<T> {
    info: MemberInfo,
    slot: Slot<T>,
}

impl<T: 'static> Member<T> {
    /// Low-level constructor. The declared `value_type` is expected to match
    /// the slot; the compiler rejects the member otherwise.
    pub fn new(
        declared_name: impl Into<Cow<'static, str>>,
        kind: MemberKind,
        value_type: ValueType,
        slot: Slot<T>,
    ) -> Self {
        Self {
            info: MemberInfo {
                declared_name: declared_name.into(),
                value_type,
                kind,
                visibility: Visibility::Public,
                is_static: false,
                attributes: Vec::new(),
            },
            slot,
        }
    }

    fn typed(declared_name: impl Into<Cow<'static, str>>, kind: MemberKind, slot: Slot<T>) -> Self {
        let value_type = slot.value_type();
        Self::new(declared_name, kind, value_type, slot)
    }

    pub fn field<V: Primitive>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
    ) -> Self {
        let handles = Handles {
            get: Some(get),
            set: Some(set),
        };
        Self::typed(name, MemberKind::Field, V::slot(handles))
    }

    pub fn getter<V: Primitive>(name: impl Into<Cow<'static, str>>, get: fn(&T) -> V) -> Self {
        let handles = Handles {
            get: Some(get),
            set: None,
        };
        Self::typed(name, MemberKind::Getter, V::slot(handles))
    }

    /// A setter method. Wrap setters that return something in a closure
    /// discarding the result.
    pub fn setter<V: Primitive>(name: impl Into<Cow<'static, str>>, set: fn(&mut T, V)) -> Self {
        let handles = Handles {
            get: None,
            set: Some(set),
        };
        Self::typed(name, MemberKind::Setter, V::slot(handles))
    }

    pub fn string_field(
        name: impl Into<Cow<'static, str>>,
        get: fn(&T) -> &str,
        set: fn(&mut T, String),
    ) -> Self {
        let handles = StringHandles {
            get: Some(get),
            set: Some(set),
        };
        Self::typed(name, MemberKind::Field, Slot::String(handles))
    }

    pub fn string_getter(name: impl Into<Cow<'static, str>>, get: fn(&T) -> &str) -> Self {
        let handles = StringHandles {
            get: Some(get),
            set: None,
        };
        Self::typed(name, MemberKind::Getter, Slot::String(handles))
    }

    pub fn string_setter(name: impl Into<Cow<'static, str>>, set: fn(&mut T, String)) -> Self {
        let handles = StringHandles {
            get: None,
            set: Some(set),
        };
        Self::typed(name, MemberKind::Setter, Slot::String(handles))
    }

    pub fn value_field(
        name: impl Into<Cow<'static, str>>,
        get: fn(&T) -> &Value,
        set: fn(&mut T, Value),
    ) -> Self {
        let handles = ValueHandles {
            get: Some(get),
            set: Some(set),
        };
        Self::typed(name, MemberKind::Field, Slot::Value(handles))
    }

    pub fn value_getter(name: impl Into<Cow<'static, str>>, get: fn(&T) -> &Value) -> Self {
        let handles = ValueHandles {
            get: Some(get),
            set: None,
        };
        Self::typed(name, MemberKind::Getter, Slot::Value(handles))
    }

    pub fn value_setter(name: impl Into<Cow<'static, str>>, set: fn(&mut T, Value)) -> Self {
        let handles = ValueHandles {
            get: None,
            set: Some(set),
        };
        Self::typed(name, MemberKind::Setter, Slot::Value(handles))
    }

    /// An opaque field of any serde type. Values are coerced through serde
    /// on the way in and out.
    pub fn object_field<V>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&T) -> &V,
        set: fn(&mut T, V),
    ) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        let handles = ObjectHandles {
            type_name: Cow::Borrowed(std::any::type_name::<V>()),
            get: Some(Arc::new(move |instance: &T| to_value(get(instance)))),
            set: Some(object_set(set)),
        };
        Self::typed(name, MemberKind::Field, Slot::Object(handles))
    }

    pub fn object_getter<V>(name: impl Into<Cow<'static, str>>, get: fn(&T) -> V) -> Self
    where
        V: Serialize + 'static,
    {
        let handles = ObjectHandles {
            type_name: Cow::Borrowed(std::any::type_name::<V>()),
            get: Some(Arc::new(move |instance: &T| to_value(&get(instance)))),
            set: None,
        };
        Self::typed(name, MemberKind::Getter, Slot::Object(handles))
    }

    pub fn object_setter<V>(name: impl Into<Cow<'static, str>>, set: fn(&mut T, V)) -> Self
    where
        V: DeserializeOwned + 'static,
    {
        let handles = ObjectHandles {
            type_name: Cow::Borrowed(std::any::type_name::<V>()),
            get: None,
            set: Some(object_set(set)),
        };
        Self::typed(name, MemberKind::Setter, Slot::Object(handles))
    }

    pub fn non_public(self) -> Self {
        self.with_visibility(Visibility::NonPublic)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.info.visibility = visibility;
        self
    }

    /// Mark the member as static (type-level). Static members are listed
    /// for completeness but never mapped.
    pub fn static_member(mut self) -> Self {
        self.info.is_static = true;
        self
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.info.attributes.push((key.into(), value.into()));
        self
    }

    pub fn info(&self) -> &MemberInfo {
        &self.info
    }

    pub fn slot(&self) -> &Slot<T> {
        &self.slot
    }
}

fn object_set<T: 'static, V>(set: fn(&mut T, V)) -> ObjectSet<T>
where
    V: DeserializeOwned + 'static,
{
    Arc::new(move |instance: &mut T, value: Value| {
        let typed: V = from_value(value)?;
        set(instance, typed);
        Ok(())
    })
}

/// Zero-valued arguments for a constructor call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// One zero value per parameter type.
    pub fn zeroed(parameter_types: &[ValueType]) -> Self {
        Self {
            values: parameter_types.iter().map(ValueType::zero).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn i64(&self, index: usize) -> i64 {
        self.get(index).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn f64(&self, index: usize) -> f64 {
        self.get(index).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn bool(&self, index: usize) -> bool {
        self.get(index).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn char(&self, index: usize) -> char {
        self.get(index)
            .and_then(Value::as_str)
            .and_then(|s| s.chars().next())
            .unwrap_or('\0')
    }

    /// `None` is the absent reference.
    pub fn string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Value::as_str)
    }
}

/// A way to build an instance of `T`.
pub struct Constructor<T> {
    parameter_types: Vec<ValueType>,
    invoke: fn(&Arguments) -> T,
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            parameter_types: self.parameter_types.clone(),
            invoke: self.invoke,
        }
    }
}

impl<T> Constructor<T> {
    pub fn new(parameter_types: Vec<ValueType>, invoke: fn(&Arguments) -> T) -> Self {
        Self {
            parameter_types,
            invoke,
        }
    }

    /// The zero-parameter constructor `T::default()`.
    pub fn default_of() -> Self
    where
        T: Default,
    {
        Self::new(Vec::new(), |_| T::default())
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    pub fn parameter_types(&self) -> &[ValueType] {
        &self.parameter_types
    }

    pub fn invoke(&self, arguments: &Arguments) -> T {
        (self.invoke)(arguments)
    }
}

/// The members and constructors of `T`, in declaration order.
pub struct StructureDescriptor<T> {
    type_id: TypeId,
    type_path: &'static str,
    type_name: Cow<'static, str>,
    members: Vec<Member<T>>,
    constructors: Vec<Constructor<T>>,
}

impl<T: 'static> StructureDescriptor<T> {
    pub fn new(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: std::any::type_name::<T>(),
            type_name: type_name.into(),
            members: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn member(mut self, member: Member<T>) -> Self {
        self.members.push(member);
        self
    }

    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type path, unique per type within a build.
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Display name given by the descriptor author.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }

    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }
}

/// Types that can describe their own structure.
///
/// Usually derived with `#[derive(Describe)]`.
pub trait Describe: Sized + 'static {
    fn describe() -> StructureDescriptor<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        id: i64,
        label: String,
        tags: Vec<String>,
        extra: Value,
    }

    fn describe_sample() -> StructureDescriptor<Sample> {
        StructureDescriptor::<Sample>::new("Sample")
            .constructor(Constructor::default_of())
            .member(Member::field::<i64>("id", |s: &Sample| s.id, |s: &mut Sample, v| s.id = v))
            .member(Member::string_getter("getLabel", |s: &Sample| s.label.as_str()))
            .member(Member::string_setter("setLabel", |s: &mut Sample, v| s.label = v))
            .member(
                Member::object_field::<Vec<String>>(
                    "tags",
                    |s: &Sample| &s.tags,
                    |s: &mut Sample, v| s.tags = v,
                )
                .non_public()
                .with_attribute("rename", "labels"),
            )
            .member(Member::value_field(
                "extra",
                |s: &Sample| &s.extra,
                |s: &mut Sample, v| s.extra = v,
            ))
    }

    #[test]
    fn members_keep_declaration_order_and_types() {
        let descriptor = describe_sample();
        let names: Vec<_> = descriptor
            .members()
            .iter()
            .map(|m| m.info().declared_name())
            .collect();
        assert_eq!(names, vec!["id", "getLabel", "setLabel", "tags", "extra"]);

        let types: Vec<_> = descriptor
            .members()
            .iter()
            .map(|m| m.info().value_type().clone())
            .collect();
        assert_eq!(types[0], ValueType::I64);
        assert_eq!(types[1], ValueType::String);
        assert!(matches!(&types[3], ValueType::Object(name) if name.contains("Vec")));
        assert_eq!(types[4], ValueType::Value);
    }

    #[test]
    fn kinds_decide_capabilities() {
        let descriptor = describe_sample();
        let members = descriptor.members();
        assert!(members[0].slot().has_get() && members[0].slot().has_set());
        assert!(members[1].slot().has_get() && !members[1].slot().has_set());
        assert!(!members[2].slot().has_get() && members[2].slot().has_set());

        assert!(MemberKind::Field.can_fill() && MemberKind::Field.can_extract());
        assert!(!MemberKind::Getter.can_fill() && MemberKind::Getter.can_extract());
        assert!(MemberKind::Setter.can_fill() && !MemberKind::Setter.can_extract());
    }

    #[test]
    fn attributes_and_visibility() {
        let descriptor = describe_sample();
        let tags = descriptor.members()[3].info();
        assert!(!tags.is_public());
        assert_eq!(tags.attribute("rename"), Some("labels"));
        assert_eq!(tags.attribute("missing"), None);
        assert!(descriptor.members()[0].info().is_public());
    }

    #[test]
    fn type_identity() {
        let descriptor = describe_sample();
        assert_eq!(descriptor.type_id(), TypeId::of::<Sample>());
        assert_eq!(descriptor.type_name(), "Sample");
        assert!(descriptor.type_path().ends_with("Sample"));
    }

    #[test]
    fn object_handles_coerce_through_serde() {
        let descriptor = describe_sample();
        let Slot::Object(handles) = descriptor.members()[3].slot() else {
            panic!("expected object slot");
        };
        let mut sample = Sample::default();
        let set = handles.set.as_ref().unwrap();
        set(&mut sample, Value::from(vec![Value::from("a"), Value::from("b")])).unwrap();
        assert_eq!(sample.tags, vec!["a".to_string(), "b".to_string()]);

        assert!(set(&mut sample, Value::from(3i64)).is_err());
        assert_eq!(sample.tags.len(), 2);

        let get = handles.get.as_ref().unwrap();
        assert_eq!(
            get(&sample).unwrap(),
            Value::from(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn zero_arguments() {
        let args = Arguments::zeroed(&[
            ValueType::I32,
            ValueType::F64,
            ValueType::Bool,
            ValueType::Char,
            ValueType::String,
            ValueType::Object("Thing".to_string()),
        ]);
        assert_eq!(args.len(), 6);
        assert_eq!(args.get(0), Some(&Value::Integer(0)));
        assert_eq!(args.get(1), Some(&Value::Float(0.0)));
        assert_eq!(args.get(2), Some(&Value::Bool(false)));
        assert_eq!(args.char(3), '\0');
        assert_eq!(args.string(4), None);
        assert_eq!(args.get(5), Some(&Value::Null));
    }

    #[test]
    fn constructor_arity() {
        let c = Constructor::<Sample>::new(vec![ValueType::I64, ValueType::String], |args| Sample {
            id: args.i64(0),
            ..Sample::default()
        });
        assert_eq!(c.arity(), 2);
        let built = c.invoke(&Arguments::zeroed(c.parameter_types()));
        assert_eq!(built.id, 0);
        assert_eq!(Constructor::<Sample>::default_of().arity(), 0);
    }

    #[test]
    fn value_type_names() {
        assert_eq!(ValueType::I32.to_string(), "i32");
        assert_eq!(ValueType::Object("Uuid".into()).to_string(), "Uuid");
        assert!(ValueType::Char.is_fast_path());
        assert!(!ValueType::Value.is_fast_path());
    }
}
