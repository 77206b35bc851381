//! Error type shared by every beanforge crate.

/// Errors raised while compiling or running converters.
///
/// Conversion failures are ordinary runtime outcomes of `fill`. The
/// descriptor and artifact variants are configuration defects surfaced at
/// compile time and never retried.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A source returned a value of the wrong runtime type for a member.
    #[error("cannot convert property '{property}': expected {expected}, found {found}")]
    Conversion {
        property: String,
        expected: String,
        found: String,
    },

    /// A source that distinguishes absent properties has none by that name.
    #[error("missing property '{property}'")]
    Missing { property: String },

    /// The descriptor handed a member whose access handles do not match its
    /// declared kind or type.
    #[error("malformed member '{member}' of {type_name}: {message}")]
    MalformedMember {
        type_name: String,
        member: String,
        message: String,
    },

    /// A resolver mapped a non-public member without the forced-access
    /// capability.
    #[error(
        "resolver '{resolver}' mapped non-public member '{member}' of {type_name} \
         without declaring forced access"
    )]
    AccessDenied {
        type_name: String,
        member: String,
        resolver: String,
    },

    /// An artifact name is already defined with different content.
    #[error("artifact '{name}' is already defined with different content")]
    ArtifactConflict { name: String },

    /// A precompiled artifact does not fit the descriptor it is linked against.
    #[error("artifact '{name}' does not match {type_name}: {message}")]
    ArtifactMismatch {
        name: String,
        type_name: String,
        message: String,
    },

    /// A type-erased call received an instance of another type.
    #[error("converter for {expected} was handed an instance of another type")]
    InstanceType { expected: String },

    /// Serializing a value or artifact failed.
    #[error("encode error: {message}")]
    Encode { message: String },

    /// Deserializing a value or artifact failed.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A lock guarding shared compiler state was poisoned by a panic.
    #[error("lock poisoned: {message}")]
    Poisoned { message: String },

    /// Generic error with message.
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn conversion(
        property: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::Conversion {
            property: property.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Error::Other {
            message: message.into(),
        }
    }

    /// Whether this error is a coercion failure of a single property.
    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Conversion { .. })
    }
}
