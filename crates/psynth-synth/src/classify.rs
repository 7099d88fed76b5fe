//! Member Classifier.
//!
//! Picks, for every interface member, how its forwarding body reaches the
//! wrapped implementation:
//!
//! | member                        | strategy          | helper                         |
//! |-------------------------------|-------------------|--------------------------------|
//! | `void M()`                    | `DirectVoidCall`  | `Execute(Action)`              |
//! | `T M()`                       | `DirectValueCall` | `Execute<T>(Func<T>)`          |
//! | `Task<T> M()`, `Task<T>? M()` | `AwaitedCall`     | `ExecuteAsync<T>(Func<Task<T>>)` |
//! | `Task M()`                    | `AwaitedCall`     | `ExecuteAsync(Func<Task>)`     |
//!
//! `ValueTask` and `ValueTask<T>` classify like their `Task` counterparts. The
//! wrapped call is converted with `AsTask()` so the helper observes the whole
//! operation, and the helper's task is wrapped back into a `ValueTask`.
//!
//! Property and indexer accessors classify independently (getter by value
//! type, setter as a void call). Events forward their accessors directly.
//!
//! The synthesis mode only decides whether awaited methods carry `async`;
//! the strategy, helper and closure are the same in both modes.

use psynth_common::diagnostics::diagnostic_messages;
use psynth_common::{
    Diagnostic, GenericParameter, InterfaceDescriptor, MemberDescriptor, Parameter, ReturnKind,
    SynthesisMode, TaskWrapper, TypeReference,
};
use tracing::{trace, warn};

/// The helper method a forwarding body funnels through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HelperKind {
    /// `void Execute(Action)`
    Void,
    /// `TResult Execute<TResult>(Func<TResult>)`
    Value,
    /// `Task<TResult> ExecuteAsync<TResult>(Func<Task<TResult>>)`
    Async,
    /// `Task ExecuteAsync(Func<Task>)`
    AsyncVoid,
}

impl HelperKind {
    /// Helpers every decorator carries, whatever the interface looks like.
    pub const STANDARD: [Self; 3] = [Self::Void, Self::Value, Self::Async];

    pub const fn is_async(self) -> bool {
        matches!(self, Self::Async | Self::AsyncVoid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardingStrategy {
    DirectVoidCall,
    DirectValueCall { result: TypeReference },
    /// The closure produces the task; the helper awaits it.
    AwaitedCall {
        result: Option<TypeReference>,
        wrapper: TaskWrapper,
    },
}

impl ForwardingStrategy {
    pub fn for_type(ty: &TypeReference) -> Self {
        match (ReturnKind::of(ty), ty.task_wrapper()) {
            (ReturnKind::Void, _) => Self::DirectVoidCall,
            (ReturnKind::Async { result }, Some(wrapper)) => Self::AwaitedCall { result, wrapper },
            (ReturnKind::Value | ReturnKind::Async { .. }, _) => Self::DirectValueCall { result: ty.clone() },
        }
    }

    pub const fn helper(&self) -> HelperKind {
        match self {
            Self::DirectVoidCall => HelperKind::Void,
            Self::DirectValueCall { .. } => HelperKind::Value,
            Self::AwaitedCall { result: Some(_), .. } => HelperKind::Async,
            Self::AwaitedCall { result: None, .. } => HelperKind::AsyncVoid,
        }
    }

    /// Type argument the helper call is instantiated with.
    pub const fn helper_type_argument(&self) -> Option<&TypeReference> {
        match self {
            Self::DirectValueCall { result } => Some(result),
            Self::AwaitedCall { result, .. } => result.as_ref(),
            Self::DirectVoidCall => None,
        }
    }

    /// Whether the helper's result is handed back to the caller.
    pub const fn returns_value(&self) -> bool {
        !matches!(self, Self::DirectVoidCall)
    }

    pub const fn is_awaited(&self) -> bool {
        matches!(self, Self::AwaitedCall { .. })
    }

    /// Whether the wrapped call returns a `ValueTask` that has to go through
    /// `AsTask()` on the way in and be rewrapped on the way out.
    pub const fn converts_value_task(&self) -> bool {
        matches!(
            self,
            Self::AwaitedCall {
                wrapper: TaskWrapper::ValueTask,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanShape {
    Method {
        strategy: ForwardingStrategy,
        /// `async` modifier plus `await` in front of the helper call.
        marks_async: bool,
    },
    /// Property or indexer accessors; `None` for an absent accessor.
    Accessors {
        getter: Option<ForwardingStrategy>,
        setter: Option<ForwardingStrategy>,
    },
    /// `add`/`remove` forwarded straight to the wrapped event.
    Event,
}

/// How one member is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisPlan {
    pub member: MemberDescriptor,
    pub shape: PlanShape,
    /// Generic parameters declared on the forwarding member, constraints
    /// included exactly as extracted.
    pub type_parameters: Vec<GenericParameter>,
    /// Generic arguments passed on to the wrapped call.
    pub type_arguments: Vec<TypeReference>,
    /// Argument names passed on to the wrapped call, in declaration order.
    pub arguments: Vec<String>,
}

impl SynthesisPlan {
    /// Helpers the forwarding body calls.
    pub fn helpers(&self) -> Vec<HelperKind> {
        match &self.shape {
            PlanShape::Method { strategy, .. } => vec![strategy.helper()],
            PlanShape::Accessors { getter, setter } => getter
                .iter()
                .chain(setter.iter())
                .map(ForwardingStrategy::helper)
                .collect(),
            PlanShape::Event => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MemberClassifier {
    mode: SynthesisMode,
}

impl MemberClassifier {
    pub const fn new(mode: SynthesisMode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> SynthesisMode {
        self.mode
    }

    /// Classify every member, keeping the ones that can be forwarded.
    pub fn classify_all(&self, descriptor: &InterfaceDescriptor) -> (Vec<SynthesisPlan>, Vec<Diagnostic>) {
        let mut plans = Vec::with_capacity(descriptor.members.len());
        let mut diagnostics = Vec::new();
        for member in &descriptor.members {
            match self.classify(member) {
                Ok(plan) => plans.push(plan),
                Err(diagnostic) => {
                    warn!(member = %member.signature(), "member cannot be forwarded");
                    diagnostics.push(diagnostic);
                }
            }
        }
        (plans, diagnostics)
    }

    /// Classify one member.
    ///
    /// Fails for members with `ref`, `out` or `in` parameters: a closure can
    /// neither capture nor write back through them.
    pub fn classify(&self, member: &MemberDescriptor) -> Result<SynthesisPlan, Diagnostic> {
        if let Some(param) = member
            .parameters()
            .iter()
            .find(|param| param.modifier.is_by_reference())
        {
            return Err(Diagnostic::from_message(
                diagnostic_messages::UNFORWARDABLE_PARAMETER,
                member.name(),
                &[
                    &member.signature().to_string(),
                    param.modifier.keyword().unwrap_or_default(),
                    &param.name,
                ],
            ));
        }

        let (shape, type_parameters) = match member {
            MemberDescriptor::Method(method) => {
                let strategy = ForwardingStrategy::for_type(&method.return_type);
                let marks_async = self.mode.marks_async() && strategy.is_awaited();
                (
                    PlanShape::Method {
                        strategy,
                        marks_async,
                    },
                    method.type_parameters.clone(),
                )
            }
            MemberDescriptor::Property(property) => (
                accessor_shape(&property.ty, property.accessors.get, property.accessors.set),
                Vec::new(),
            ),
            MemberDescriptor::Indexer(indexer) => (
                accessor_shape(&indexer.ty, indexer.accessors.get, indexer.accessors.set),
                Vec::new(),
            ),
            MemberDescriptor::Event(_) => (PlanShape::Event, Vec::new()),
        };

        let plan = SynthesisPlan {
            type_arguments: type_parameters
                .iter()
                .map(|param| TypeReference::type_parameter(&param.name))
                .collect(),
            arguments: member.parameters().iter().map(|p: &Parameter| p.name.clone()).collect(),
            type_parameters,
            shape,
            member: member.clone(),
        };
        trace!(member = %plan.member.signature(), shape = ?plan.shape, "member classified");
        Ok(plan)
    }
}

/// Accessors never carry `async`: a task-typed getter hands back the async
/// helper's task in either mode.
fn accessor_shape(ty: &TypeReference, get: bool, set: bool) -> PlanShape {
    PlanShape::Accessors {
        getter: get.then(|| ForwardingStrategy::for_type(ty)),
        setter: set.then_some(ForwardingStrategy::DirectVoidCall),
    }
}

#[cfg(test)]
#[path = "../tests/classify_tests.rs"]
mod classify_tests;
