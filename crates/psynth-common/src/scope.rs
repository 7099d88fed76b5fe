//! Namespace scopes and the known-type catalog.
//!
//! A `TypeScope` models what a simple type name means at one declaration
//! point: the enclosing namespaces (innermost first), the `using` imports and
//! the `using X = ...` aliases. Lookups only ever answer from the catalog of
//! known types; a name the catalog does not know is never assumed to resolve.

use crate::type_ref::{NamedType, TypeParseError, TypeReference};
use rustc_hash::FxHashMap;

/// Types every synthesis request may mention, as (namespace, name, arities).
const WELL_KNOWN_TYPES: &[(&str, &str, &[usize])] = &[
    ("System", "Action", &[0, 1, 2, 3, 4]),
    ("System", "Func", &[1, 2, 3, 4, 5]),
    ("System", "Boolean", &[0]),
    ("System", "Byte", &[0]),
    ("System", "Char", &[0]),
    ("System", "DateTime", &[0]),
    ("System", "DateTimeOffset", &[0]),
    ("System", "Decimal", &[0]),
    ("System", "Double", &[0]),
    ("System", "EventArgs", &[0]),
    ("System", "EventHandler", &[0, 1]),
    ("System", "Exception", &[0]),
    ("System", "Guid", &[0]),
    ("System", "IDisposable", &[0]),
    ("System", "IAsyncDisposable", &[0]),
    ("System", "Int16", &[0]),
    ("System", "Int32", &[0]),
    ("System", "Int64", &[0]),
    ("System", "Nullable", &[1]),
    ("System", "Object", &[0]),
    ("System", "Single", &[0]),
    ("System", "String", &[0]),
    ("System", "TimeSpan", &[0]),
    ("System", "Uri", &[0]),
    ("System.Collections", "IEnumerable", &[0]),
    ("System.Collections", "IEnumerator", &[0]),
    ("System.Collections.Generic", "ICollection", &[1]),
    ("System.Collections.Generic", "IDictionary", &[2]),
    ("System.Collections.Generic", "IEnumerable", &[1]),
    ("System.Collections.Generic", "IEnumerator", &[1]),
    ("System.Collections.Generic", "IAsyncEnumerable", &[1]),
    ("System.Collections.Generic", "IList", &[1]),
    ("System.Collections.Generic", "IReadOnlyCollection", &[1]),
    ("System.Collections.Generic", "IReadOnlyDictionary", &[2]),
    ("System.Collections.Generic", "IReadOnlyList", &[1]),
    ("System.Collections.Generic", "KeyValuePair", &[2]),
    ("System.Collections.Generic", "Dictionary", &[2]),
    ("System.Collections.Generic", "List", &[1]),
    ("System.Threading", "CancellationToken", &[0]),
    ("System.Threading.Tasks", "Task", &[0, 1]),
    ("System.Threading.Tasks", "ValueTask", &[0, 1]),
    ("Polly", "Policy", &[0, 1]),
    ("Polly", "AsyncPolicy", &[0, 1]),
    ("Polly", "IAsyncPolicy", &[0, 1]),
    ("Polly", "ISyncPolicy", &[0, 1]),
    ("Polly", "ResiliencePipeline", &[0, 1]),
];

/// Known types, indexed by (simple name, generic arity).
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    by_name: FxHashMap<(String, usize), Vec<String>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-populated with the BCL and Polly types synthesis uses.
    pub fn with_well_known() -> Self {
        let mut catalog = Self::new();
        for (namespace, name, arities) in WELL_KNOWN_TYPES {
            for arity in *arities {
                catalog.insert(namespace, name, *arity);
            }
        }
        catalog
    }

    pub fn insert(&mut self, namespace: &str, name: &str, arity: usize) {
        let namespaces = self.by_name.entry((name.to_string(), arity)).or_default();
        if !namespaces.iter().any(|ns| ns == namespace) {
            namespaces.push(namespace.to_string());
        }
    }

    /// Record every qualified named type mentioned by `ty`.
    pub fn insert_reference(&mut self, ty: &TypeReference) {
        ty.visit(&mut |node| {
            if let TypeReference::Named(NamedType {
                namespace: Some(namespace),
                name,
                arguments,
            }) = node
            {
                self.insert(namespace, name, arguments.len());
            }
        });
    }

    pub fn namespaces_of(&self, name: &str, arity: usize) -> &[String] {
        self.by_name
            .get(&(name.to_string(), arity))
            .map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, namespace: &str, name: &str, arity: usize) -> bool {
        self.namespaces_of(name, arity)
            .iter()
            .any(|ns| ns == namespace)
    }
}

/// Outcome of looking a simple name up in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one namespace provides the name.
    Namespace(String),
    /// The name is a `using` alias and nothing else provides it.
    Alias(TypeReference),
    /// Several imports (or an import and an alias) provide the name.
    Ambiguous(Vec<String>),
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    namespace: Option<String>,
    imports: Vec<String>,
    aliases: FxHashMap<String, TypeReference>,
    catalog: TypeCatalog,
}

impl TypeScope {
    pub fn new(namespace: Option<&str>, catalog: TypeCatalog) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            imports: Vec::new(),
            aliases: FxHashMap::default(),
            catalog,
        }
    }

    /// Add a `using` directive: `System.Linq`, `Repo = Acme.Data.Repository`.
    /// `using static` directives bring no type names into scope and are ignored.
    pub fn add_import(&mut self, directive: &str) -> Result<(), TypeParseError> {
        let directive = directive.trim().trim_end_matches(';').trim();
        let directive = directive.strip_prefix("using ").unwrap_or(directive).trim();
        if directive.starts_with("static ") {
            return Ok(());
        }
        if let Some((alias, target)) = directive.split_once('=') {
            let target = TypeReference::parse(target.trim())?;
            self.aliases.insert(alias.trim().to_string(), target);
        } else if !directive.is_empty() && !self.imports.iter().any(|ns| ns == directive) {
            self.imports.push(directive.to_string());
        }
        Ok(())
    }

    pub fn with_imports<'a>(
        mut self,
        directives: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, TypeParseError> {
        for directive in directives {
            self.add_import(directive)?;
        }
        Ok(self)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Enclosing namespaces, innermost first (`A.B.C`, `A.B`, `A`).
    pub fn enclosing_namespaces(&self) -> Vec<&str> {
        let mut namespaces = Vec::new();
        if let Some(namespace) = self.namespace.as_deref() {
            let mut current = namespace;
            loop {
                namespaces.push(current);
                match current.rfind('.') {
                    Some(dot) => current = &current[..dot],
                    None => break,
                }
            }
        }
        namespaces
    }

    /// Look a simple name up the way the compiler would at this point:
    /// enclosing namespaces innermost-first then the global namespace (first
    /// hit wins), then aliases and imports together (more than one hit is
    /// ambiguous). A global-namespace hit is `Namespace("")`.
    pub fn resolve(&self, name: &str, arity: usize) -> Resolution {
        let providers = self.catalog.namespaces_of(name, arity);

        for namespace in self.enclosing_namespaces() {
            if providers.iter().any(|ns| ns == namespace) {
                return Resolution::Namespace(namespace.to_string());
            }
        }
        // The global namespace encloses every declaration.
        if providers.iter().any(|ns| ns.is_empty()) {
            return Resolution::Namespace(String::new());
        }

        let mut hits: Vec<String> = self
            .imports
            .iter()
            .filter(|import| providers.iter().any(|ns| ns == *import))
            .cloned()
            .collect();
        let alias = if arity == 0 { self.aliases.get(name) } else { None };

        match (hits.len(), alias) {
            (0, None) => Resolution::NotFound,
            (0, Some(target)) => Resolution::Alias(target.clone()),
            (1, None) => Resolution::Namespace(hits.remove(0)),
            (_, alias) => {
                if let Some(target) = alias {
                    hits.push(target.to_string());
                }
                Resolution::Ambiguous(hits)
            }
        }
    }

    /// The alias naming exactly `ty`, if any.
    pub fn alias_for(&self, ty: &TypeReference) -> Option<&str> {
        self.aliases
            .iter()
            .filter(|(_, target)| *target == ty)
            .map(|(alias, _)| alias.as_str())
            .min()
    }

    /// Qualify every bare named type in `ty` that resolves uniquely here.
    /// Names that are ambiguous or unknown are left bare.
    pub fn qualify(&self, ty: &TypeReference) -> TypeReference {
        ty.transform(&mut |node| match node {
            TypeReference::Named(named) if named.namespace.is_none() => {
                match self.resolve(&named.name, named.arguments.len()) {
                    Resolution::Namespace(namespace) if namespace.is_empty() => {
                        TypeReference::Named(named)
                    }
                    Resolution::Namespace(namespace) => TypeReference::Named(NamedType {
                        namespace: Some(namespace),
                        ..named
                    }),
                    Resolution::Alias(target) => target,
                    Resolution::Ambiguous(_) | Resolution::NotFound => {
                        TypeReference::Named(named)
                    }
                }
            }
            other => other,
        })
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod scope_tests;
