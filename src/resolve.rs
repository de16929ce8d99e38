//! Data resolution in the current engine's addressing syntax.
//!
//! References look like `$flow.customer.id`, `$activity[log].message`, `$env[HOME]` or
//! `$.body`. The converter never evaluates a reference; it only asks a [`DataResolver`]
//! whether a rewritten reference is one the engine will be able to resolve.

use ahash::AHashMap;
use itertools::Itertools;

/// The resolver collaborator used to validate rewritten mapping references.
///
/// Implementations must be safe for concurrent read access, since one converter may be
/// shared between threads.
pub trait DataResolver: Send + Sync {
    /// Returns `Err` with a human readable reason when `reference` cannot be resolved.
    fn validate_reference(&self, reference: &str) -> Result<(), String>;
}

/// Whether a scope is addressed by name (`$env[HOME]`) or by path (`$flow.a.b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Named,
    Path,
}

/// A resolver that accepts references whose scope is registered.
#[derive(Debug, Clone)]
pub struct ScopedResolver {
    scopes: AHashMap<String, ScopeKind>,
}

pub struct ScopedResolverBuilder {
    scopes: AHashMap<String, ScopeKind>,
}

impl ScopedResolverBuilder {
    pub fn new() -> Self {
        let mut scopes = AHashMap::new();
        register_default_scopes(&mut scopes);
        Self { scopes }
    }

    /// Starts from an empty registry.
    pub fn empty() -> Self {
        Self {
            scopes: AHashMap::new(),
        }
    }

    pub fn with_scope(mut self, name: &str, kind: ScopeKind) -> Self {
        self.scopes.insert(name.to_string(), kind);
        self
    }

    pub fn build(self) -> ScopedResolver {
        ScopedResolver {
            scopes: self.scopes,
        }
    }
}

impl Default for ScopedResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopedResolver {
    pub fn builder() -> ScopedResolverBuilder {
        ScopedResolverBuilder::new()
    }

    /// Names of the registered scopes, sorted.
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.keys().map(String::as_str).sorted().collect()
    }
}

impl Default for ScopedResolver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DataResolver for ScopedResolver {
    fn validate_reference(&self, reference: &str) -> Result<(), String> {
        let (scope, rest) = split_scope(reference)
            .ok_or_else(|| format!("'{}' is not a '$' reference", reference))?;

        let kind = self.scopes.get(scope).ok_or_else(|| {
            format!(
                "unknown scope '{}' in '{}' (known scopes: {})",
                scope,
                reference,
                self.scopes().iter().join(", ")
            )
        })?;

        match kind {
            ScopeKind::Named => {
                let name = rest
                    .strip_prefix('[')
                    .and_then(|r| r.split_once(']'))
                    .map(|(name, _)| name);
                match name {
                    Some(name) if !name.trim().is_empty() => Ok(()),
                    _ => Err(format!(
                        "scope '{}' requires a name, e.g. ${}[name]",
                        scope, scope
                    )),
                }
            }
            ScopeKind::Path => Ok(()),
        }
    }
}

/// Splits `$scope...` into the scope name and the remainder.
/// The current scope `$.` is reported as `"."`.
pub fn split_scope(reference: &str) -> Option<(&str, &str)> {
    let body = reference.strip_prefix('$')?;
    if body.starts_with('.') {
        return Some((".", &body[1..]));
    }
    let end = body.find(['[', '.']).unwrap_or(body.len());
    if end == 0 {
        return None;
    }
    Some((&body[..end], &body[end..]))
}

fn register_default_scopes(scopes: &mut AHashMap<String, ScopeKind>) {
    for name in [".", "flow", "error"] {
        scopes.insert(name.to_string(), ScopeKind::Path);
    }
    for name in ["activity", "env", "property", "iteration"] {
        scopes.insert(name.to_string(), ScopeKind::Named);
    }
}
