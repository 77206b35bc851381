mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use beanforge_compiler::{
    compile, compile_descriptor, link, Artifact, ConverterCache, DefaultResolver, FnResolver,
    AccessPolicy, NameResolver, property_name,
};
use beanforge_core::{Constructor, Describe, Error, StructureDescriptor};
use lazy_static::lazy_static;

use common::{Other, User};

fn snake_case() -> impl beanforge_compiler::NameResolver {
    FnResolver::new("snake", AccessPolicy::PublicOnly, |member, role| {
        if !member.is_public() {
            return None;
        }
        let name = match role {
            Some(role) => property_name(member.declared_name(), role),
            None => member.declared_name().to_string(),
        };
        Some(name.to_lowercase())
    })
}

/// Maps `Other.name` under `to`, always reporting the id "same".
fn renaming(to: &'static str) -> impl NameResolver {
    FnResolver::new("same", AccessPolicy::PublicOnly, move |member, _role| {
        (member.declared_name() == "name").then(|| to.to_string())
    })
}

#[test]
fn concurrent_requests_share_one_synthesis() {
    let cache = ConverterCache::new();

    let converters: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| cache.get_or_compile::<User>(&DefaultResolver).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.syntheses(), 1);
    assert_eq!(cache.len(), 1);
    assert!(converters.iter().all(|c| Arc::ptr_eq(c, &converters[0])));
}

#[test]
fn repeated_requests_hit_the_cache() {
    let cache = ConverterCache::new();
    let first = cache.get_or_compile::<User>(&DefaultResolver).unwrap();
    let second = cache.get_or_compile::<User>(&DefaultResolver).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.syntheses(), 1);
    assert_eq!(cache.loader().len(), 1);
}

#[test]
fn global_cache_is_shared() {
    let first = compile::<User>().unwrap();
    let second = compile::<User>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(ConverterCache::global().len() >= 1);
}

#[test]
fn resolvers_are_part_of_the_key() {
    let cache = ConverterCache::new();
    let default = cache.get_or_compile::<User>(&DefaultResolver).unwrap();
    let snake = cache.get_or_compile::<User>(&snake_case()).unwrap();

    assert!(!Arc::ptr_eq(&default, &snake));
    assert_eq!(cache.syntheses(), 2);
    assert!(default.name().ends_with("UserBean"));
    assert!(snake.name().ends_with("UserBean$snake"));
    assert_eq!(cache.loader().len(), 2);
}

#[test]
fn types_are_part_of_the_key() {
    let cache = ConverterCache::new();
    let user = cache.get_or_compile::<User>(&DefaultResolver).unwrap();
    let other = cache.get_or_compile::<Other>(&DefaultResolver).unwrap();
    assert_eq!(user.type_name(), "User");
    assert_eq!(other.type_name(), "Other");
    assert_eq!(cache.len(), 2);
}

#[cfg(debug_assertions)]
#[test]
fn resolvers_sharing_an_id_must_agree() {
    let cache = ConverterCache::new();
    let first = cache.get_or_compile::<Other>(&renaming("a")).unwrap();
    assert_eq!(first.fill_properties().collect::<Vec<_>>(), vec!["a"]);

    match cache.get_or_compile::<Other>(&renaming("b")) {
        Err(Error::ArtifactConflict { name }) => assert!(name.ends_with("OtherBean$same")),
        other => panic!("expected a conflict, got {other:?}"),
    }
    let again = cache.get_or_compile::<Other>(&renaming("a")).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.syntheses(), 1);
}

#[test]
fn compile_descriptor_registers_nothing() {
    let cache = ConverterCache::new();
    let bytes = compile_descriptor::<Other>("OtherDetached", &DefaultResolver).unwrap();
    assert!(!bytes.is_empty());

    assert_eq!(cache.syntheses(), 0);
    assert!(cache.is_empty());
    assert!(cache.loader().is_empty());
    assert!(ConverterCache::global()
        .loader()
        .get("OtherDetached")
        .unwrap()
        .is_none());
}

lazy_static! {
    static ref NESTED: ConverterCache = ConverterCache::new();
    static ref DESCRIBING: Barrier = Barrier::new(2);
}

/// Compiles another type from inside its own `describe`.
#[derive(Default)]
pub struct Outer;

impl Describe for Outer {
    fn describe() -> StructureDescriptor<Self> {
        DESCRIBING.wait();
        thread::sleep(Duration::from_millis(50));
        NESTED.get_or_compile::<Other>(&DefaultResolver).unwrap();
        StructureDescriptor::<Outer>::new("Outer").constructor(Constructor::default_of())
    }
}

#[test]
fn counting_while_a_describe_compiles_another_type() {
    let count = thread::scope(|scope| {
        let compiling = scope.spawn(|| NESTED.get_or_compile::<Outer>(&DefaultResolver).unwrap());
        DESCRIBING.wait();
        let count = NESTED.len();
        compiling.join().unwrap();
        count
    });
    assert!(count >= 1);
    assert_eq!(NESTED.len(), 2);
}

#[test]
fn precompiled_artifact_links_to_an_equivalent_converter() {
    let bytes = compile_descriptor::<User>("UserPrecompiled", &DefaultResolver).unwrap();
    let artifact = Artifact::from_bytes(&bytes).unwrap();
    assert_eq!(artifact.name, "UserPrecompiled");
    assert_eq!(artifact.resolver, "default");

    let linked = link::<User>(&bytes).unwrap();
    let compiled = compile::<User>().unwrap();

    let user = User::new("Linus", 54, true);
    assert_eq!(linked.to_map(&user).unwrap(), compiled.to_map(&user).unwrap());
    assert_eq!(linked.artifact().fill, compiled.artifact().fill);
    assert_eq!(linked.artifact().extract, compiled.artifact().extract);
}

#[test]
fn linking_against_another_type_is_a_mismatch() {
    let bytes = compile_descriptor::<User>("UserForOther", &DefaultResolver).unwrap();
    assert!(matches!(
        link::<Other>(&bytes),
        Err(Error::ArtifactMismatch { .. })
    ));
    assert!(matches!(link::<User>(b"{}"), Err(Error::Decode { .. })));
}

#[test]
fn installed_artifact_serves_later_requests() {
    let cache = ConverterCache::new();
    let bytes = compile_descriptor::<User>("UserInstalled", &DefaultResolver).unwrap();

    let installed = cache.install::<User>(&bytes).unwrap();
    let requested = cache.get_or_compile::<User>(&DefaultResolver).unwrap();
    assert!(Arc::ptr_eq(&installed, &requested));
    assert_eq!(cache.syntheses(), 0);
    assert_eq!(requested.name(), "UserInstalled");

    // identical content under the same name is accepted again
    let again = cache.install::<User>(&bytes).unwrap();
    assert!(Arc::ptr_eq(&installed, &again));
}

#[test]
fn same_name_different_content_conflicts() {
    let cache = ConverterCache::new();
    let user = compile_descriptor::<User>("Shared", &DefaultResolver).unwrap();
    let other = compile_descriptor::<Other>("Shared", &DefaultResolver).unwrap();

    cache.install::<User>(&user).unwrap();
    match cache.install::<Other>(&other) {
        Err(Error::ArtifactConflict { name }) => assert_eq!(name, "Shared"),
        other => panic!("expected a conflict, got {other:?}"),
    }
    // the conflicting type was not cached
    assert_eq!(cache.len(), 1);
}
