//! Interface Model Extractor.
//!
//! Flattens an interface and everything it inherits into the member set an
//! implementing class must expose.
//!
//! # Walk order
//!
//! The interface's own members come first, then each base interface in
//! declaration order, depth first. Generic interfaces are instantiated on the
//! way down: `IRepository<Order>` substitutes `Order` for `T` in its members
//! and in the references to its own bases.
//!
//! # Duplicates
//!
//! A member reachable through several inheritance paths is kept once. Two
//! members with the same signature but different value types (the generic and
//! non-generic `GetEnumerator`) cannot share one implicit implementation, so
//! the later one is kept as an explicit implementation of its declaring
//! interface.

use crate::declarations::{DeclarationSource, InterfaceDeclaration, RawMember, RawMemberKind};
use indexmap::IndexMap;
use indexmap::map::Entry;
use psynth_common::diagnostics::diagnostic_messages;
use psynth_common::limits::MAX_INTERFACE_DEPTH;
use psynth_common::{
    AccessorSet, Diagnostic, EventDescriptor, GenericParameter, IndexerDescriptor,
    InterfaceDescriptor, MemberDescriptor, MethodDescriptor, Parameter, PropertyDescriptor,
    ReturnKind, Signature, SynthesisError, TypeCatalog, TypeReference, TypeScope,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

/// An extracted interface plus the members that had to be left out.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub descriptor: InterfaceDescriptor,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct InterfaceExtractor<'a, S: DeclarationSource + ?Sized> {
    source: &'a S,
    catalog: TypeCatalog,
}

/// Resolves type syntax written inside one interface declaration.
struct MemberContext<'s> {
    scope: &'s TypeScope,
    /// Interface-level type parameter names.
    outer: &'s FxHashSet<String>,
    /// Interface type parameter -> instantiating argument.
    instantiation: &'s FxHashMap<String, TypeReference>,
    interface: &'s TypeReference,
    interface_name: &'s str,
}

#[derive(Default)]
struct WalkState {
    members: IndexMap<(Signature, Option<TypeReference>), MemberDescriptor>,
    visited: FxHashSet<TypeReference>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, S: DeclarationSource + ?Sized> InterfaceExtractor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            catalog: source.catalog(),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Describe the interface `reference` names, instantiated with its
    /// generic arguments.
    ///
    /// Fails only when `reference` itself cannot be resolved. Problems with
    /// individual members or bases are reported as diagnostics.
    pub fn describe(&self, reference: &TypeReference) -> Result<Extraction, SynthesisError> {
        let root = self.source.find_interface(reference)?;
        let instantiated = instantiate(root, reference);
        debug!(interface = %instantiated, "extracting interface members");

        let mut state = WalkState::default();
        self.walk(root, &instantiated, 0, &mut state)?;

        let descriptor = InterfaceDescriptor {
            interface: instantiated,
            members: state.members.into_values().collect(),
        };
        debug!(
            interface = %descriptor.interface,
            members = descriptor.members.len(),
            excluded = state.diagnostics.len(),
            "interface extracted"
        );
        Ok(Extraction {
            descriptor,
            diagnostics: state.diagnostics,
        })
    }

    fn walk(
        &self,
        decl: &InterfaceDeclaration,
        instantiated: &TypeReference,
        depth: usize,
        state: &mut WalkState,
    ) -> Result<(), SynthesisError> {
        if !state.visited.insert(instantiated.clone()) {
            trace!(interface = %instantiated, "already visited");
            return Ok(());
        }
        if depth > MAX_INTERFACE_DEPTH {
            warn!(interface = %instantiated, "interface inheritance too deep");
            state.diagnostics.push(Diagnostic::from_message(
                diagnostic_messages::INTERFACE_INHERITANCE_TOO_DEEP,
                &decl.qualified_name(),
                &[&decl.qualified_name(), &MAX_INTERFACE_DEPTH.to_string()],
            ));
            return Ok(());
        }

        let scope = decl.scope(self.catalog.clone())?;
        let outer: FxHashSet<String> = decl.type_parameters.iter().map(|p| p.name.clone()).collect();
        let arguments = instantiated
            .as_named()
            .map(|named| named.arguments.as_slice())
            .unwrap_or_default();
        let instantiation: FxHashMap<String, TypeReference> = decl
            .type_parameters
            .iter()
            .map(|p| p.name.clone())
            .zip(arguments.iter().cloned())
            .collect();
        let interface_name = decl.qualified_name();
        let context = MemberContext {
            scope: &scope,
            outer: &outer,
            instantiation: &instantiation,
            interface: instantiated,
            interface_name: &interface_name,
        };

        for raw in &decl.members {
            match context.describe_member(raw) {
                Ok(Some(member)) => insert_member(state, member, instantiated),
                Ok(None) => {}
                Err(diagnostic) => {
                    warn!(member = %raw.name, interface = %interface_name, "member excluded");
                    state.diagnostics.push(diagnostic);
                }
            }
        }

        for base in &decl.bases {
            let base_ref = context.resolve(base, &outer);
            match self.source.find_interface(&base_ref) {
                Ok(base_decl) => {
                    let base_ref = instantiate(base_decl, &base_ref);
                    self.walk(base_decl, &base_ref, depth + 1, state)?;
                }
                Err(_) => {
                    warn!(base = %base_ref, interface = %interface_name, "unresolved base interface");
                    state.diagnostics.push(Diagnostic::from_message(
                        diagnostic_messages::UNRESOLVED_BASE_INTERFACE,
                        &base_ref.to_string(),
                        &[&base_ref.to_string(), &interface_name],
                    ));
                }
            }
        }
        Ok(())
    }
}

/// The declaration's qualified reference carrying `reference`'s arguments.
fn instantiate(decl: &InterfaceDeclaration, reference: &TypeReference) -> TypeReference {
    let arguments = reference
        .as_named()
        .map(|named| named.arguments.clone())
        .unwrap_or_default();
    TypeReference::named(
        decl.namespace.as_deref().unwrap_or_default(),
        &decl.name,
        arguments,
    )
}

fn insert_member(state: &mut WalkState, member: MemberDescriptor, declaring: &TypeReference) {
    let signature = member.signature();
    match state.members.entry((signature.clone(), None)) {
        Entry::Vacant(slot) => {
            trace!(signature = %signature, "member added");
            slot.insert(member);
        }
        Entry::Occupied(mut existing) => {
            if existing.get().value_type() == member.value_type() {
                trace!(signature = %signature, "duplicate member collapsed");
                merge_accessors(existing.get_mut(), &member);
                return;
            }
            let mut member = member;
            member.set_explicit_interface(declaring.clone());
            debug!(
                signature = %signature,
                interface = %declaring,
                "conflicting member kept as explicit implementation"
            );
            state
                .members
                .entry((signature, Some(declaring.clone())))
                .or_insert(member);
        }
    }
}

/// `int X { get; }` and `new int X { get; set; }` collapse to a get/set pair.
fn merge_accessors(existing: &mut MemberDescriptor, incoming: &MemberDescriptor) {
    let union = |a: AccessorSet, b: AccessorSet| AccessorSet {
        get: a.get || b.get,
        set: a.set || b.set,
    };
    match (existing, incoming) {
        (MemberDescriptor::Property(a), MemberDescriptor::Property(b)) => {
            a.accessors = union(a.accessors, b.accessors);
        }
        (MemberDescriptor::Indexer(a), MemberDescriptor::Indexer(b)) => {
            a.accessors = union(a.accessors, b.accessors);
        }
        _ => {}
    }
}

impl MemberContext<'_> {
    /// Bind in-scope type parameters, qualify against the declaration's scope,
    /// then instantiate interface type parameters.
    fn resolve(&self, ty: &TypeReference, names: &FxHashSet<String>) -> TypeReference {
        let qualified = self.scope.qualify(&ty.bind_type_parameters(names));
        qualified.substitute(self.instantiation)
    }

    fn resolve_parameters(&self, parameters: &[Parameter], names: &FxHashSet<String>) -> Vec<Parameter> {
        parameters
            .iter()
            .map(|param| Parameter {
                ty: self.resolve(&param.ty, names),
                ..param.clone()
            })
            .collect()
    }

    fn unsupported(&self, raw: &RawMember, kind: &str) -> Diagnostic {
        Diagnostic::from_message(
            diagnostic_messages::UNSUPPORTED_MEMBER_KIND,
            &raw.name,
            &[&raw.name, self.interface_name, kind],
        )
    }

    /// `Ok(None)` for members the class need not implement.
    fn describe_member(&self, raw: &RawMember) -> Result<Option<MemberDescriptor>, Diagnostic> {
        if let Some(error) = &raw.read_error {
            return Err(Diagnostic::from_message(
                diagnostic_messages::UNREADABLE_MEMBER,
                &raw.name,
                &[&raw.name, self.interface_name, error],
            ));
        }
        if raw.body.is_some() {
            trace!(member = %raw.name, "default implementation, not required");
            return Ok(None);
        }
        if raw.is_static {
            return Err(self.unsupported(raw, &format!("static {}", raw.kind.label())));
        }

        let member = match raw.kind {
            RawMemberKind::Method => {
                // Method type parameters shadow interface ones of the same name.
                let own: FxHashSet<String> = raw.type_parameters.iter().map(|p| p.name.clone()).collect();
                let names: FxHashSet<String> = self.outer.union(&own).cloned().collect();
                let instantiation: FxHashMap<String, TypeReference> = self
                    .instantiation
                    .iter()
                    .filter(|(name, _)| !own.contains(*name))
                    .map(|(name, ty)| (name.clone(), ty.clone()))
                    .collect();
                let shadowed = MemberContext {
                    instantiation: &instantiation,
                    ..*self
                };
                let return_type = raw
                    .ty
                    .as_ref()
                    .map_or(TypeReference::Void, |ty| shadowed.resolve(ty, &names));
                MemberDescriptor::Method(MethodDescriptor {
                    name: raw.name.clone(),
                    type_parameters: shadowed.resolve_type_parameters(&raw.type_parameters, &names),
                    parameters: shadowed.resolve_parameters(&raw.parameters, &names),
                    returns: ReturnKind::of(&return_type),
                    return_type,
                    explicit_interface: None,
                })
            }
            RawMemberKind::Property => {
                let Some(ty) = &raw.ty else {
                    return Err(self.unsupported(raw, "untyped property"));
                };
                MemberDescriptor::Property(PropertyDescriptor {
                    name: raw.name.clone(),
                    ty: self.resolve(ty, self.outer),
                    accessors: raw.accessors.unwrap_or(AccessorSet::GET_SET),
                    explicit_interface: None,
                })
            }
            RawMemberKind::Indexer => {
                let Some(ty) = &raw.ty else {
                    return Err(self.unsupported(raw, "untyped indexer"));
                };
                MemberDescriptor::Indexer(IndexerDescriptor {
                    parameters: self.resolve_parameters(&raw.parameters, self.outer),
                    ty: self.resolve(ty, self.outer),
                    accessors: raw.accessors.unwrap_or(AccessorSet::GET_SET),
                    explicit_interface: None,
                })
            }
            RawMemberKind::Event => {
                let Some(ty) = &raw.ty else {
                    return Err(self.unsupported(raw, "untyped event"));
                };
                MemberDescriptor::Event(EventDescriptor {
                    name: raw.name.clone(),
                    ty: self.resolve(ty, self.outer),
                    explicit_interface: None,
                })
            }
            RawMemberKind::Field
            | RawMemberKind::Constructor
            | RawMemberKind::Operator
            | RawMemberKind::Conversion
            | RawMemberKind::Unknown => return Err(self.unsupported(raw, raw.kind.label())),
        };
        trace!(member = %member.signature(), interface = %self.interface, "member described");
        Ok(Some(member))
    }

    /// Constraints are carried through unchanged apart from type resolution.
    fn resolve_type_parameters(
        &self,
        parameters: &[GenericParameter],
        names: &FxHashSet<String>,
    ) -> Vec<GenericParameter> {
        parameters
            .iter()
            .map(|param| GenericParameter {
                name: param.name.clone(),
                constraints: param
                    .constraints
                    .iter()
                    .map(|constraint| constraint.map_type(|ty| self.resolve(ty, names)))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/extractor_tests.rs"]
mod extractor_tests;
