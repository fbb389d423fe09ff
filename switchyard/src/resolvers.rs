//! Resolvers shipped with the crate.

use switchyard_common::{AliasSet, Resolution, ResolutionError, ResolutionRequest, StorageResolver};

/// Stateless resolver matching a file's extension against
/// delimiter-separated components of each backend alias.
///
/// With file `hello.py`, the aliases `"py"`, `"py|txt|cpp"` and `"py|"`
/// all match, while `"txt|"` and `"p|y"` do not. Files without an
/// extension match aliases with an empty component (`"|py"`, `""`).
/// Aliases containing dots never match. The first match in registry order
/// wins; no filename or no match yields [`Resolution::Fallback`].
///
/// Deterministic by construction: the decision depends only on the file
/// name and the (immutable) alias set. Intended for examples and tests;
/// real deployments want project-specific routing logic.
pub struct ExtensionResolver {
    delimiter: char,
}

impl ExtensionResolver {
    pub fn new() -> Self {
        Self { delimiter: '|' }
    }

    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for ExtensionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageResolver for ExtensionResolver {
    fn name(&self) -> &str {
        "extension"
    }

    fn resolve(
        &self,
        known_aliases: &AliasSet,
        request: &ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError> {
        let Some(name) = request.file_identity else {
            return Ok(Resolution::Fallback);
        };
        let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        for alias in known_aliases.iter() {
            if alias.split(self.delimiter).any(|component| component == extension) {
                return Ok(Resolution::Route(alias.to_string()));
            }
        }
        Ok(Resolution::Fallback)
    }
}
