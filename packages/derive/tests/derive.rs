use beanforge_core::{
    Describe, Member, MemberKind, Slot, StructureDescriptor, Value, ValueType, Visibility,
};
use beanforge_derive::Describe;

#[derive(Describe, Default, Debug, PartialEq)]
#[bean(default, extend = "with_accessors")]
pub struct Profile {
    pub name: String,
    #[bean(rename = "years")]
    age: i32,
    pub score: f64,
    pub initial: char,
    pub tags: Vec<String>,
    pub extra: Value,
    #[bean(attr(column = "is_active", format = "flag"))]
    pub active: bool,
    #[bean(skip)]
    pub scratch: Vec<u8>,
}

fn with_accessors(descriptor: StructureDescriptor<Profile>) -> StructureDescriptor<Profile> {
    descriptor
        .member(Member::getter::<i32>("getAge", |p: &Profile| p.age))
        .member(Member::setter::<i32>("setAge", |p: &mut Profile, v| p.age = v))
}

#[derive(Describe)]
struct NoConstructor {
    pub id: i64,
}

#[test]
fn fields_in_declaration_order_then_extension() {
    let descriptor = Profile::describe();
    let names: Vec<_> = descriptor
        .members()
        .iter()
        .map(|m| m.info().declared_name())
        .collect();
    assert_eq!(
        names,
        vec!["name", "age", "score", "initial", "tags", "extra", "active", "getAge", "setAge"]
    );
    assert_eq!(descriptor.type_name(), "Profile");
    assert_eq!(descriptor.constructors().len(), 1);
    assert_eq!(descriptor.constructors()[0].arity(), 0);
}

#[test]
fn field_types_map_to_value_types() {
    let descriptor = Profile::describe();
    let types: Vec<_> = descriptor
        .members()
        .iter()
        .map(|m| m.info().value_type().clone())
        .collect();
    assert_eq!(types[0], ValueType::String);
    assert_eq!(types[1], ValueType::I32);
    assert_eq!(types[2], ValueType::F64);
    assert_eq!(types[3], ValueType::Char);
    assert!(matches!(types[4], ValueType::Object(_)));
    assert_eq!(types[5], ValueType::Value);
    assert_eq!(types[6], ValueType::Bool);
}

#[test]
fn visibility_and_attributes() {
    let descriptor = Profile::describe();
    let members = descriptor.members();

    assert_eq!(members[0].info().visibility(), Visibility::Public);
    assert_eq!(members[1].info().visibility(), Visibility::NonPublic);
    assert_eq!(members[1].info().attribute("rename"), Some("years"));
    assert_eq!(members[6].info().attribute("column"), Some("is_active"));
    assert_eq!(members[6].info().attribute("format"), Some("flag"));
    assert!(members.iter().all(|m| !m.info().is_static()));
    assert!(members[..7].iter().all(|m| m.info().kind() == MemberKind::Field));
}

#[test]
fn generated_handles_read_and_write_fields() {
    let descriptor = Profile::describe();
    let mut profile = Profile::default();

    let Slot::I32(age) = descriptor.members()[1].slot() else {
        panic!("age should be an i32 slot");
    };
    (age.set.unwrap())(&mut profile, 41);
    assert_eq!((age.get.unwrap())(&profile), 41);

    let Slot::String(name) = descriptor.members()[0].slot() else {
        panic!("name should be a string slot");
    };
    (name.set.unwrap())(&mut profile, "Ada".to_string());
    assert_eq!((name.get.unwrap())(&profile), "Ada");
}

#[test]
fn no_default_means_no_constructor() {
    let descriptor = NoConstructor::describe();
    assert!(descriptor.constructors().is_empty());
    assert_eq!(descriptor.members().len(), 1);
}
