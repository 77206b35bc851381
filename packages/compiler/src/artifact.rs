//! Serializable description of a synthesized converter.
//!
//! An artifact records every decision the compiler made: the chosen
//! constructor and, per direction, which member is accessed under which
//! property name. Realizing an artifact against a descriptor of the same
//! type yields a converter without consulting any resolver.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use beanforge_core::{Error, MemberKind, ValueType};

/// One member access of a fill or extract plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Position of the member in the descriptor.
    pub index: usize,
    /// External property name.
    pub property: String,
    /// Declared member name, checked against the descriptor on realize.
    pub member: String,
    pub kind: MemberKind,
    pub value_type: ValueType,
    /// Mapped despite being non-public.
    #[serde(default)]
    pub forced: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructorSpec {
    pub index: usize,
    pub parameter_types: Vec<ValueType>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub type_path: String,
    pub resolver: String,
    pub constructor: Option<ConstructorSpec>,
    pub fill: Vec<StepSpec>,
    pub extract: Vec<StepSpec>,
}

impl Artifact {
    /// Encode as JSON bytes.
    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| Error::Encode {
                message: format!("artifact '{}': {}", self.name, e),
            })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::Decode {
            message: format!("artifact: {}", e),
        })
    }

    /// Artifact names: `{type}Bean` for the default resolver,
    /// `{type}Bean${resolver}` for any other.
    pub fn name_for(type_path: &str, resolver: &str, is_default: bool) -> String {
        if is_default {
            format!("{}Bean", type_path)
        } else {
            format!("{}Bean${}", type_path, resolver)
        }
    }
}
