#![allow(dead_code)]

use beanforge_core::{Constructor, Describe, Member, StructureDescriptor};

/// A bean-style type: one public field, accessor pairs over private state,
/// a private field and a static counter.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    age: i32,
    active: bool,
    hidden: String,
    instances: i64,
}

impl User {
    pub fn new(name: &str, age: i32, active: bool) -> Self {
        Self {
            name: name.to_string(),
            age,
            active,
            hidden: "hidden".to_string(),
            instances: 0,
        }
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn hidden(&self) -> &str {
        &self.hidden
    }
}

impl Describe for User {
    fn describe() -> StructureDescriptor<Self> {
        StructureDescriptor::<User>::new("User")
            .constructor(Constructor::default_of())
            .member(Member::string_field(
                "name",
                |u: &User| u.name.as_str(),
                |u: &mut User, v| u.name = v,
            ))
            .member(Member::field::<i32>("age", |u: &User| u.age, |u: &mut User, v| u.age = v).non_public())
            .member(Member::getter::<i32>("getAge", |u: &User| u.age))
            .member(Member::setter::<i32>("setAge", |u: &mut User, v| u.age = v))
            .member(Member::getter::<bool>("isActive", |u: &User| u.active))
            .member(Member::setter::<bool>("setActive", |u: &mut User, v| u.active = v))
            .member(
                Member::string_field(
                    "hidden",
                    |u: &User| u.hidden.as_str(),
                    |u: &mut User, v| u.hidden = v,
                )
                .non_public(),
            )
            .member(
                Member::field::<i64>(
                    "INSTANCES",
                    |u: &User| u.instances,
                    |u: &mut User, v| u.instances = v,
                )
                .static_member(),
            )
    }
}

/// Shares nothing with `User` but its shape.
#[derive(Default, Debug, PartialEq)]
pub struct Other {
    pub name: String,
}

impl Describe for Other {
    fn describe() -> StructureDescriptor<Self> {
        StructureDescriptor::<Other>::new("Other")
            .constructor(Constructor::default_of())
            .member(Member::string_field(
                "name",
                |o: &Other| o.name.as_str(),
                |o: &mut Other, v| o.name = v,
            ))
    }
}
