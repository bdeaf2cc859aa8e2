//! Overload resolution and special-member synthesis for a C++ front end.
//!
//! The engine ([`Sema`]) works over an interned type pool ([`Pool`]) and a
//! symbol arena ([`SymbolTable`]) supplied by the caller:
//!
//! - [`Sema::compute_conversion`] ranks how an argument converts to a
//!   parameter type
//! - [`Sema::find_user_conversion`] picks a converting constructor or a
//!   conversion function
//! - [`Sema::resolve_call`] gathers candidates (ordinary lookup plus ADL),
//!   deduces templates and selects the best viable function
//! - [`Sema::complete_class`] declares the implicit special members of a
//!   class and decides deletion, triviality, `noexcept` and constexpr
//!
//! Failures flow through [`ResolveError`] and [`SemaError`] and are
//! reported to a `cxx_diagnostic::DiagnosticQueue` unless the call is a
//! probe.

mod context;
mod conversion;
mod error;
mod expr;
mod flags;
mod fundamental;
mod hierarchy;
mod idx;
mod options;
mod overload;
mod pool;
mod sema;
mod special;
mod stack;
mod symbols;
pub mod testing;
mod tracing_setup;
mod user_conv;

pub use context::{Guard, ResolutionContext};
pub use conversion::{
    arithmetic_conversion, ClassStep, ConvContext, ConvKind, ConvRank, ConversionSeq, QualStep, RefBinding,
    SeqClass, UserStep,
};
pub use error::{ResolveError, SemaError};
pub use expr::{Arg, ArgShape, CallDescriptor, ValueCategory};
pub use flags::{CallFlags, Quals, SymbolFlags, UserConvFlags};
pub use fundamental::Fundamental;
pub use hierarchy::{BaseLookup, BasePath};
pub use idx::Idx;
pub use options::{RecursionLimits, SemaOptions, TargetInfo};
pub use overload::{Candidate, Gathered, LookupContext, Ranker, ResolvedCall, Selection};
pub use pool::{Pool, RefKind, TypeData, TypePrinter};
pub use sema::Sema;
pub use special::{
    DeletionReason, Init, InitTarget, MemberInitializer, ParamForm, SpecialKind, SpecialMember, SpecialMembers,
    Stmt, Subobject,
};
pub use stack::ensure_sufficient_stack;
pub use symbols::{
    Access, BaseSpec, ClassInfo, ClassKey, EnumInfo, FieldDecl, FunctionInfo, Param, Scope, StorageClass, Symbol,
    SymbolId, SymbolKind, SymbolTable, TemplateParamDecl,
};
pub use tracing_setup::{init_tracing, LogFormat};
pub use user_conv::{UserConvResult, UserConversion};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Idx, SymbolId};
    cxx_ir::static_assert_size!(Idx, 4);
    cxx_ir::static_assert_size!(SymbolId, 4);
}
