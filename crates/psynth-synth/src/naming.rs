//! Names of the synthesized fields, constructor parameters and helpers.
//!
//! The two fields are identified by type, not name: when the class already
//! declares a field of the interface type (or of the policy type), that field
//! is the binding and every synthesized body refers to it by its existing
//! name. Fresh names are derived from the interface and made unique against
//! everything the class and the interface already declare.
//!
//! Helper names depend only on the interface, never on the class, so a rerun
//! after the helpers were inserted finds them under the same names.

use psynth_common::limits::MAX_NAME_SUFFIX;
use psynth_common::{ClassSnapshot, InterfaceDescriptor, SynthesisOptions, TypeReference};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBindings {
    pub class_name: String,
    pub implementation_type: TypeReference,
    pub implementation_field: String,
    pub implementation_parameter: String,
    pub policy_type: TypeReference,
    pub policy_field: String,
    pub policy_parameter: String,
    pub execute_helper: String,
    pub execute_async_helper: String,
}

impl FieldBindings {
    pub fn resolve(
        descriptor: &InterfaceDescriptor,
        snapshot: &ClassSnapshot,
        options: &SynthesisOptions,
    ) -> Self {
        let interface_names: FxHashSet<&str> =
            descriptor.members.iter().map(|member| member.name()).collect();

        let execute_helper = unique_name(&options.execute_helper, &interface_names);
        let execute_async_helper = unique_name(&options.execute_async_helper, &interface_names);

        let mut taken: FxHashSet<&str> = snapshot.member_names();
        taken.extend(interface_names.iter().copied());
        taken.insert(&execute_helper);
        taken.insert(&execute_async_helper);

        let implementation_type = descriptor.interface.clone();
        let implementation_field = match snapshot.field_of_type(&implementation_type) {
            Some(existing) => {
                debug!(field = existing, "reusing existing implementation field");
                existing.to_string()
            }
            None => {
                let preferred = options
                    .implementation_field
                    .clone()
                    .unwrap_or_else(|| field_name_for(descriptor.name()));
                unique_name(&preferred, &taken)
            }
        };
        taken.insert(&implementation_field);

        let policy_field = match snapshot.field_of_type(&options.policy_type) {
            Some(existing) => {
                debug!(field = existing, "reusing existing policy field");
                existing.to_string()
            }
            None => unique_name(&options.policy_field, &taken),
        };

        let implementation_parameter = options
            .implementation_parameter
            .clone()
            .unwrap_or_else(|| parameter_name_for(&implementation_field));
        let policy_parameter = {
            let mut parameter_taken = FxHashSet::default();
            parameter_taken.insert(implementation_parameter.as_str());
            unique_name(&options.policy_parameter, &parameter_taken)
        };

        Self {
            class_name: snapshot.name().to_string(),
            implementation_type,
            implementation_field,
            implementation_parameter,
            policy_type: options.policy_type.clone(),
            policy_field,
            policy_parameter,
            execute_helper,
            execute_async_helper,
        }
    }
}

/// `IOrderService` -> `_orderService`, `Repository` -> `_repository`.
pub fn field_name_for(interface_name: &str) -> String {
    let mut chars = interface_name.chars();
    let stem = match (chars.next(), chars.next()) {
        (Some('I'), Some(second)) if second.is_uppercase() => &interface_name[1..],
        _ => interface_name,
    };
    format!("_{}", lower_first(stem))
}

/// `_orderService` -> `orderService`.
pub fn parameter_name_for(field_name: &str) -> String {
    let stem = field_name.trim_start_matches('_');
    if stem.is_empty() {
        return "inner".to_string();
    }
    lower_first(stem)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `base`, or `base2`, `base3`, ... whichever is free first.
pub fn unique_name(base: &str, taken: &FxHashSet<&str>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    for suffix in 2..=MAX_NAME_SUFFIX {
        let candidate = format!("{base}{suffix}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
    warn!(name = base, "no free name suffix, keeping the colliding name");
    base.to_string()
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod naming_tests;
