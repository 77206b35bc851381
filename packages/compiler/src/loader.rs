//! Registry of defined artifacts.

use std::collections::HashMap;
use std::sync::Mutex;

use beanforge_core::Error;

use crate::artifact::Artifact;
use crate::cache::poisoned;

/// Names every artifact defined through it, at most once.
///
/// Redefining a name with identical content is a no-op; with different
/// content it fails with `Error::ArtifactConflict`.
#[derive(Debug, Default)]
pub struct ArtifactLoader {
    defined: Mutex<HashMap<String, Artifact>>,
}

impl ArtifactLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define an artifact, returning the registered definition.
    pub fn define(&self, artifact: Artifact) -> Result<Artifact, Error> {
        let mut defined = self.defined.lock().map_err(poisoned)?;
        match defined.get(&artifact.name) {
            Some(existing) if *existing == artifact => {
                log::trace!("artifact {} already defined", artifact.name);
                Ok(existing.clone())
            }
            Some(_) => {
                log::error!("artifact {} redefined with different content", artifact.name);
                Err(Error::ArtifactConflict {
                    name: artifact.name,
                })
            }
            None => {
                log::debug!("defined artifact {}", artifact.name);
                defined.insert(artifact.name.clone(), artifact.clone());
                Ok(artifact)
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<Option<Artifact>, Error> {
        let defined = self.defined.lock().map_err(poisoned)?;
        Ok(defined.get(name).cloned())
    }

    pub fn len(&self) -> usize {
        self.defined.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, resolver: &str) -> Artifact {
        Artifact {
            name: name.to_string(),
            type_path: "app::User".to_string(),
            resolver: resolver.to_string(),
            constructor: None,
            fill: vec![],
            extract: vec![],
        }
    }

    #[test]
    fn identical_redefinition_is_accepted() {
        let loader = ArtifactLoader::new();
        loader.define(artifact("UserBean", "default")).unwrap();
        let again = loader.define(artifact("UserBean", "default")).unwrap();
        assert_eq!(again, artifact("UserBean", "default"));
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn conflicting_redefinition_fails() {
        let loader = ArtifactLoader::new();
        loader.define(artifact("UserBean", "default")).unwrap();
        let err = loader.define(artifact("UserBean", "other")).unwrap_err();
        assert!(matches!(err, Error::ArtifactConflict { ref name } if name == "UserBean"));
        // the first definition stays
        assert_eq!(
            loader.get("UserBean").unwrap().unwrap().resolver,
            "default"
        );
    }

    #[test]
    fn distinct_names_coexist() {
        let loader = ArtifactLoader::new();
        loader.define(artifact("UserBean", "default")).unwrap();
        loader.define(artifact("UserBean$snake", "snake")).unwrap();
        assert_eq!(loader.len(), 2);
        assert!(loader.get("Nope").unwrap().is_none());
    }
}
