//! Decorator Synthesizer.
//!
//! Builds the candidate member set of a decorator class:
//!
//! ```text
//! private readonly IFoo _foo;
//! private readonly Policy _policy;
//!
//! public FooDecorator(IFoo foo, Policy policy) { _foo = foo; _policy = policy; }
//!
//! public Task<T> M1<T>(string s) { return ExecuteAsync<T>(() => _foo.M1<T>(s)); }
//! ...
//! private void Execute(Action action) { _policy.Execute(action); }
//! private TResult Execute<TResult>(Func<TResult> func) { return _policy.Execute(func); }
//! private Task<TResult> ExecuteAsync<TResult>(Func<Task<TResult>> func) { return _policy.ExecuteAsync(func); }
//! ```
//!
//! Candidates come out in a fixed order (fields, constructor, forwarding
//! members in interface order, helpers). Nothing here looks at what the class
//! already contains beyond the names carried in `FieldBindings`; deciding
//! what is missing is the merge engine's job.

use crate::classify::{ForwardingStrategy, HelperKind, MemberClassifier, PlanShape, SynthesisPlan};
use crate::ir::{
    Accessibility, ConstructorDeclaration, Declaration, EventDeclaration, Expr, FieldDeclaration,
    MethodDeclaration, PropertyDeclaration, PropertyName, Statement,
};
use crate::naming::FieldBindings;
use psynth_common::{
    Diagnostic, GenericParameter, InterfaceDescriptor, MemberDescriptor, MemberKey, Parameter,
    SynthesisMode, SynthesisOptions, TypeReference,
};
use tracing::{debug, trace};

/// What a candidate is for. Only forwarding members correspond to interface
/// members; everything else is decorator plumbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationRole {
    ImplementationField,
    PolicyField,
    Constructor,
    Forwarding,
    Helper(HelperKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMember {
    pub role: DeclarationRole,
    pub declaration: Declaration,
}

impl CandidateMember {
    pub fn key(&self) -> MemberKey {
        self.declaration.key()
    }

    pub fn explicit_interface(&self) -> Option<&TypeReference> {
        self.declaration.explicit_interface()
    }

    pub const fn is_helper(&self) -> bool {
        matches!(self.role, DeclarationRole::Helper(_))
    }
}

/// The full decorator for one interface, before merging.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub interface: TypeReference,
    pub mode: SynthesisMode,
    pub bindings: FieldBindings,
    pub members: Vec<CandidateMember>,
    /// Members that could not be forwarded.
    pub diagnostics: Vec<Diagnostic>,
}

impl CandidateSet {
    pub fn count(&self, predicate: impl Fn(DeclarationRole) -> bool) -> usize {
        self.members.iter().filter(|member| predicate(member.role)).count()
    }

    pub fn forwarding(&self) -> impl Iterator<Item = &CandidateMember> {
        self.members
            .iter()
            .filter(|member| member.role == DeclarationRole::Forwarding)
    }
}

pub struct DecoratorSynthesizer<'o> {
    options: &'o SynthesisOptions,
    classifier: MemberClassifier,
}

impl<'o> DecoratorSynthesizer<'o> {
    pub const fn new(options: &'o SynthesisOptions) -> Self {
        Self {
            options,
            classifier: MemberClassifier::new(options.mode),
        }
    }

    pub const fn with_mode(mut self, mode: SynthesisMode) -> Self {
        self.classifier = MemberClassifier::new(mode);
        self
    }

    pub const fn mode(&self) -> SynthesisMode {
        self.classifier.mode()
    }

    pub fn synthesize(&self, descriptor: &InterfaceDescriptor, bindings: &FieldBindings) -> CandidateSet {
        let (plans, diagnostics) = self.classifier.classify_all(descriptor);
        let emitter = Emitter {
            options: self.options,
            bindings,
            mode: self.mode(),
        };

        let mut members = vec![
            CandidateMember {
                role: DeclarationRole::ImplementationField,
                declaration: emitter.field(&bindings.implementation_field, &bindings.implementation_type),
            },
            CandidateMember {
                role: DeclarationRole::PolicyField,
                declaration: emitter.field(&bindings.policy_field, &bindings.policy_type),
            },
            CandidateMember {
                role: DeclarationRole::Constructor,
                declaration: emitter.constructor(),
            },
        ];

        let mut helpers = HelperKind::STANDARD.to_vec();
        for plan in &plans {
            trace!(member = %plan.member.signature(), "synthesizing forwarding member");
            members.push(CandidateMember {
                role: DeclarationRole::Forwarding,
                declaration: emitter.forwarding(plan),
            });
            for helper in plan.helpers() {
                if !helpers.contains(&helper) {
                    helpers.push(helper);
                }
            }
        }
        members.extend(helpers.into_iter().map(|kind| CandidateMember {
            role: DeclarationRole::Helper(kind),
            declaration: emitter.helper(kind),
        }));

        debug!(
            interface = %descriptor.interface,
            mode = ?self.mode(),
            candidates = members.len(),
            excluded = diagnostics.len(),
            "decorator synthesized"
        );
        CandidateSet {
            interface: descriptor.interface.clone(),
            mode: self.mode(),
            bindings: bindings.clone(),
            members,
            diagnostics,
        }
    }
}

/// Builds declarations for one synthesis request.
struct Emitter<'a> {
    options: &'a SynthesisOptions,
    bindings: &'a FieldBindings,
    mode: SynthesisMode,
}

const ACTION_PARAMETER: &str = "action";
const FUNC_PARAMETER: &str = "func";
const AS_TASK_METHOD: &str = "AsTask";

impl Emitter<'_> {
    fn field(&self, name: &str, ty: &TypeReference) -> Declaration {
        Declaration::Field(FieldDeclaration {
            name: name.to_string(),
            ty: ty.clone(),
            readonly: self.options.readonly_fields,
        })
    }

    fn constructor(&self) -> Declaration {
        let b = self.bindings;
        let assign = |field: &str, parameter: &str| {
            let target = if field == parameter {
                Expr::This.member(field)
            } else {
                Expr::identifier(field)
            };
            Statement::Expression(target.assign(Expr::identifier(parameter)))
        };
        Declaration::Constructor(ConstructorDeclaration {
            class_name: b.class_name.clone(),
            parameters: vec![
                Parameter::new(&b.implementation_parameter, b.implementation_type.clone()),
                Parameter::new(&b.policy_parameter, b.policy_type.clone()),
            ],
            body: vec![
                assign(&b.implementation_field, &b.implementation_parameter),
                assign(&b.policy_field, &b.policy_parameter),
            ],
        })
    }

    /// The wrapped instance as seen by a member: cast to the declaring
    /// interface for explicit implementations.
    fn target(&self, member: &MemberDescriptor) -> Expr {
        let field = Expr::identifier(&self.bindings.implementation_field);
        match member.explicit_interface() {
            Some(interface) => field.cast(interface.clone()),
            None => field,
        }
    }

    /// `Execute(() => inner)`, `ExecuteAsync<T>(() => inner)`, ...
    fn helper_call(&self, strategy: &ForwardingStrategy, inner: Expr) -> Expr {
        let name = match strategy.helper() {
            HelperKind::Void | HelperKind::Value => &self.bindings.execute_helper,
            HelperKind::Async | HelperKind::AsyncVoid => &self.bindings.execute_async_helper,
        };
        Expr::identifier(name).call(
            strategy.helper_type_argument().cloned().into_iter().collect(),
            vec![Expr::lambda(inner)],
        )
    }

    /// `value_type` is the member's declared type; a `ValueTask` result is
    /// rebuilt from the helper's task unless the body awaits it.
    fn forwarding_body(
        &self,
        strategy: &ForwardingStrategy,
        value_type: &TypeReference,
        inner: Expr,
        awaits: bool,
    ) -> Vec<Statement> {
        let converts = strategy.converts_value_task();
        let inner = if converts {
            inner.member(AS_TASK_METHOD).call(Vec::new(), Vec::new())
        } else {
            inner
        };
        let call = self.helper_call(strategy, inner);
        let call = if awaits {
            call.awaited()
        } else if converts {
            Expr::construct(value_type.clone(), vec![call])
        } else {
            call
        };
        let statement = match strategy {
            ForwardingStrategy::DirectVoidCall => Statement::Expression(call),
            ForwardingStrategy::AwaitedCall { result: None, .. } if awaits => Statement::Expression(call),
            _ => Statement::Return(call),
        };
        vec![statement]
    }

    fn accessibility(member: &MemberDescriptor) -> Accessibility {
        if member.explicit_interface().is_some() {
            Accessibility::None
        } else {
            Accessibility::Public
        }
    }

    fn arguments(plan: &SynthesisPlan) -> Vec<Expr> {
        plan.arguments.iter().map(|name| Expr::identifier(name)).collect()
    }

    fn forwarding(&self, plan: &SynthesisPlan) -> Declaration {
        let member = &plan.member;
        let target = self.target(member);
        let accessibility = Self::accessibility(member);
        let explicit_interface = member.explicit_interface().cloned();

        match &plan.shape {
            PlanShape::Method {
                strategy,
                marks_async,
            } => {
                let inner = target
                    .member(member.name())
                    .call(plan.type_arguments.clone(), Self::arguments(plan));
                Declaration::Method(MethodDeclaration {
                    accessibility,
                    is_async: *marks_async,
                    return_type: member.value_type().clone(),
                    explicit_interface,
                    name: member.name().to_string(),
                    type_parameters: plan.type_parameters.clone(),
                    parameters: member.parameters().to_vec(),
                    body: self.forwarding_body(strategy, member.value_type(), inner, *marks_async),
                })
            }
            PlanShape::Accessors { getter, setter } => {
                let (name, access) = match member {
                    MemberDescriptor::Indexer(indexer) => (
                        PropertyName::Indexer(indexer.parameters.clone()),
                        target.index(Self::arguments(plan)),
                    ),
                    _ => (
                        PropertyName::Named(member.name().to_string()),
                        target.member(member.name()),
                    ),
                };
                let value_type = member.value_type();
                let getter = getter
                    .as_ref()
                    .map(|strategy| self.forwarding_body(strategy, value_type, access.clone(), false));
                let setter = setter.as_ref().map(|strategy| {
                    let assignment = access.clone().assign(Expr::identifier("value"));
                    self.forwarding_body(strategy, value_type, assignment, false)
                });
                Declaration::Property(PropertyDeclaration {
                    accessibility,
                    ty: member.value_type().clone(),
                    explicit_interface,
                    name,
                    getter,
                    setter,
                })
            }
            PlanShape::Event => {
                let event = target.member(member.name());
                let subscribe = |operator: &'static str| {
                    vec![Statement::Expression(
                        event.clone().compound_assign(operator, Expr::identifier("value")),
                    )]
                };
                Declaration::Event(EventDeclaration {
                    accessibility,
                    ty: member.value_type().clone(),
                    explicit_interface,
                    name: member.name().to_string(),
                    add: subscribe("+="),
                    remove: subscribe("-="),
                })
            }
        }
    }

    fn helper(&self, kind: HelperKind) -> Declaration {
        let result = TypeReference::type_parameter(&self.options.helper_type_parameter);
        let policy = Expr::identifier(&self.bindings.policy_field);
        let awaits = kind.is_async() && self.mode.marks_async();

        let (name, type_parameters, parameter, return_type, policy_method) = match kind {
            HelperKind::Void => (
                &self.bindings.execute_helper,
                Vec::new(),
                Parameter::new(ACTION_PARAMETER, TypeReference::action()),
                TypeReference::Void,
                &self.options.policy_execute_method,
            ),
            HelperKind::Value => (
                &self.bindings.execute_helper,
                vec![GenericParameter::new(&self.options.helper_type_parameter)],
                Parameter::new(FUNC_PARAMETER, TypeReference::func(result.clone())),
                result,
                &self.options.policy_execute_method,
            ),
            HelperKind::Async => (
                &self.bindings.execute_async_helper,
                vec![GenericParameter::new(&self.options.helper_type_parameter)],
                Parameter::new(
                    FUNC_PARAMETER,
                    TypeReference::func(TypeReference::task(Some(result.clone()))),
                ),
                TypeReference::task(Some(result)),
                &self.options.policy_execute_async_method,
            ),
            HelperKind::AsyncVoid => (
                &self.bindings.execute_async_helper,
                Vec::new(),
                Parameter::new(FUNC_PARAMETER, TypeReference::func(TypeReference::task(None))),
                TypeReference::task(None),
                &self.options.policy_execute_async_method,
            ),
        };

        let call = policy
            .member(policy_method)
            .call(Vec::new(), vec![Expr::identifier(&parameter.name)]);
        let call = if awaits { call.awaited() } else { call };
        let statement = match kind {
            HelperKind::Void => Statement::Expression(call),
            HelperKind::AsyncVoid if awaits => Statement::Expression(call),
            HelperKind::Value | HelperKind::Async | HelperKind::AsyncVoid => Statement::Return(call),
        };

        Declaration::Method(MethodDeclaration {
            accessibility: Accessibility::Private,
            is_async: awaits,
            return_type,
            explicit_interface: None,
            name: name.clone(),
            type_parameters,
            parameters: vec![parameter],
            body: vec![statement],
        })
    }
}

#[cfg(test)]
#[path = "../tests/synthesizer_tests.rs"]
mod synthesizer_tests;
