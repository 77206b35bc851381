//! Name resolution: which members participate, and under which property name.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use beanforge_core::{MemberInfo, MemberKind};

/// Whether a method is being resolved as a getter (extract) or a setter (fill).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodRole {
    Getter,
    Setter,
}

impl MethodRole {
    /// The role of a method member. Fields have none.
    pub fn of(kind: MemberKind) -> Option<Self> {
        match kind {
            MemberKind::Getter => Some(MethodRole::Getter),
            MemberKind::Setter => Some(MethodRole::Setter),
            MemberKind::Field => None,
        }
    }
}

/// The access capability a resolver declares.
///
/// A `PublicOnly` resolver that names a non-public member fails compilation
/// with `Error::AccessDenied`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessPolicy {
    #[default]
    PublicOnly,
    ForceNonPublic,
}

/// Identity of a resolver, part of the converter cache key and of the
/// artifact name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolverId(Cow<'static, str>);

impl ResolverId {
    pub const DEFAULT: ResolverId = ResolverId(Cow::Borrowed("default"));

    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl fmt::Display for ResolverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Policy mapping members to property names.
///
/// Returning `None` skips the member. Two resolvers with the same `id` must
/// behave identically, since converters are cached per id.
pub trait NameResolver: Send + Sync {
    fn id(&self) -> ResolverId;

    fn access(&self) -> AccessPolicy {
        AccessPolicy::PublicOnly
    }

    fn method_name(&self, member: &MemberInfo, role: MethodRole) -> Option<String>;

    fn field_name(&self, member: &MemberInfo) -> Option<String>;
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn id(&self) -> ResolverId {
        (**self).id()
    }

    fn access(&self) -> AccessPolicy {
        (**self).access()
    }

    fn method_name(&self, member: &MemberInfo, role: MethodRole) -> Option<String> {
        (**self).method_name(member, role)
    }

    fn field_name(&self, member: &MemberInfo) -> Option<String> {
        (**self).field_name(member)
    }
}

impl<R: NameResolver + ?Sized> NameResolver for Box<R> {
    fn id(&self) -> ResolverId {
        (**self).id()
    }

    fn access(&self) -> AccessPolicy {
        (**self).access()
    }

    fn method_name(&self, member: &MemberInfo, role: MethodRole) -> Option<String> {
        (**self).method_name(member, role)
    }

    fn field_name(&self, member: &MemberInfo) -> Option<String> {
        (**self).field_name(member)
    }
}

impl<R: NameResolver + ?Sized> NameResolver for Arc<R> {
    fn id(&self) -> ResolverId {
        (**self).id()
    }

    fn access(&self) -> AccessPolicy {
        (**self).access()
    }

    fn method_name(&self, member: &MemberInfo, role: MethodRole) -> Option<String> {
        (**self).method_name(member, role)
    }

    fn field_name(&self, member: &MemberInfo) -> Option<String> {
        (**self).field_name(member)
    }
}

/// Public members only, bean-style method names.
///
/// ```rust
/// use beanforge_compiler::{property_name, MethodRole};
///
/// assert_eq!(property_name("getAge", MethodRole::Getter), "age");
/// assert_eq!(property_name("isActive", MethodRole::Getter), "active");
/// assert_eq!(property_name("set_age", MethodRole::Setter), "age");
/// assert_eq!(property_name("settle", MethodRole::Setter), "settle");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResolver;

impl NameResolver for DefaultResolver {
    fn id(&self) -> ResolverId {
        ResolverId::DEFAULT
    }

    fn method_name(&self, member: &MemberInfo, role: MethodRole) -> Option<String> {
        member
            .is_public()
            .then(|| property_name(member.declared_name(), role))
    }

    fn field_name(&self, member: &MemberInfo) -> Option<String> {
        member
            .is_public()
            .then(|| member.declared_name().to_string())
    }
}

/// Strip the accessor prefix of a method name and lower-case the first
/// remaining character.
///
/// Getters lose `get` or `is`, setters lose `set`, but only when the prefix
/// is followed by an upper-case letter or an underscore. Any other name is
/// returned unchanged.
pub fn property_name(declared: &str, role: MethodRole) -> String {
    let prefixes: &[&str] = match role {
        MethodRole::Getter => &["get", "is"],
        MethodRole::Setter => &["set"],
    };

    prefixes
        .iter()
        .find_map(|prefix| declared.strip_prefix(prefix).and_then(after_prefix))
        .map(lower_first)
        .unwrap_or_else(|| declared.to_string())
}

fn after_prefix(rest: &str) -> Option<&str> {
    if let Some(stripped) = rest.strip_prefix('_') {
        return (!stripped.is_empty()).then_some(stripped);
    }
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase())
        .map(|_| rest)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Maps members carrying an attribute under the attribute's value.
///
/// Members without the attribute are skipped, public or not. Annotated
/// non-public members are mapped, so this resolver forces access.
#[derive(Clone, Debug)]
pub struct AttributeResolver {
    key: Cow<'static, str>,
}

impl AttributeResolver {
    /// Resolve through the `rename` attribute.
    pub fn new() -> Self {
        Self::with_key("rename")
    }

    pub fn with_key(key: impl Into<Cow<'static, str>>) -> Self {
        Self { key: key.into() }
    }

    fn name(&self, member: &MemberInfo) -> Option<String> {
        member.attribute(&self.key).map(str::to_string)
    }
}

impl Default for AttributeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver for AttributeResolver {
    fn id(&self) -> ResolverId {
        ResolverId::new(format!("attribute:{}", self.key))
    }

    fn access(&self) -> AccessPolicy {
        AccessPolicy::ForceNonPublic
    }

    fn method_name(&self, member: &MemberInfo, _role: MethodRole) -> Option<String> {
        self.name(member)
    }

    fn field_name(&self, member: &MemberInfo) -> Option<String> {
        self.name(member)
    }
}

/// A resolver backed by a closure.
///
/// The closure sees the role for methods and `None` for fields.
///
/// ```rust
/// use beanforge_compiler::{AccessPolicy, FnResolver};
///
/// let upper = FnResolver::new("upper", AccessPolicy::PublicOnly, |member, _role| {
///     member.is_public().then(|| member.declared_name().to_uppercase())
/// });
/// ```
pub struct FnResolver<F> {
    id: ResolverId,
    access: AccessPolicy,
    f: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&MemberInfo, Option<MethodRole>) -> Option<String> + Send + Sync,
{
    pub fn new(id: impl Into<Cow<'static, str>>, access: AccessPolicy, f: F) -> Self {
        Self {
            id: ResolverId::new(id),
            access,
            f,
        }
    }
}

impl<F> NameResolver for FnResolver<F>
where
    F: Fn(&MemberInfo, Option<MethodRole>) -> Option<String> + Send + Sync,
{
    fn id(&self) -> ResolverId {
        self.id.clone()
    }

    fn access(&self) -> AccessPolicy {
        self.access
    }

    fn method_name(&self, member: &MemberInfo, role: MethodRole) -> Option<String> {
        (self.f)(member, Some(role))
    }

    fn field_name(&self, member: &MemberInfo) -> Option<String> {
        (self.f)(member, None)
    }
}

/// Ask the resolver for a member's name, dispatching on its kind.
pub fn resolve_name(resolver: &dyn NameResolver, member: &MemberInfo) -> Option<String> {
    match MethodRole::of(member.kind()) {
        Some(role) => resolver.method_name(member, role),
        None => resolver.field_name(member),
    }
}
