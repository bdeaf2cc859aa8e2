//! The engine.

use cxx_diagnostic::{Diagnostic, DiagnosticQueue};
use cxx_ir::StringInterner;

use crate::context::{Guard, ResolutionContext};
use crate::overload::Ranker;
use crate::stack::ensure_sufficient_stack;
use crate::{Pool, SemaOptions, SymbolTable, TypePrinter};

/// Overload resolution and special-member synthesis over one translation
/// unit's types and symbols.
///
/// Holds the pool and symbol table mutably: resolution interns new types
/// and instantiates templates, synthesis declares implicit members.
pub struct Sema<'tu> {
    pub(crate) pool: &'tu mut Pool,
    pub(crate) symbols: &'tu mut SymbolTable,
    pub(crate) interner: &'tu StringInterner,
    pub(crate) options: &'tu SemaOptions,
    pub(crate) ctx: ResolutionContext,
    pub(crate) diagnostics: DiagnosticQueue,
}

impl<'tu> Sema<'tu> {
    pub fn new(
        pool: &'tu mut Pool,
        symbols: &'tu mut SymbolTable,
        interner: &'tu StringInterner,
        options: &'tu SemaOptions,
    ) -> Self {
        Sema {
            pool,
            symbols,
            interner,
            ctx: ResolutionContext::new(options.limits),
            diagnostics: DiagnosticQueue::with_config(options.diagnostics.clone()),
            options,
        }
    }

    pub fn pool(&self) -> &Pool {
        self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        self.pool
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        self.symbols
    }

    pub fn options(&self) -> &SemaOptions {
        self.options
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.ctx
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    /// Drain reported diagnostics, sorted by position.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.flush()
    }

    pub fn printer(&self) -> TypePrinter<'_> {
        TypePrinter::new(self.pool, self.symbols, self.interner)
    }

    pub(crate) fn ranker(&self) -> Ranker<'_> {
        Ranker::new(self.symbols, &self.options.target)
    }

    /// Run `f` one level deeper in `guard`, on a stack with room to spare.
    ///
    /// Returns `None` without running `f` when the limit is reached.
    pub(crate) fn guarded<R>(&mut self, guard: Guard, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        if !self.ctx.try_enter(guard) {
            tracing::debug!(%guard, depth = self.ctx.depth(guard), "recursion limit reached");
            return None;
        }
        let result = ensure_sufficient_stack(|| f(self));
        self.ctx.exit(guard);
        Some(result)
    }

    /// Queue a diagnostic.
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.add(diagnostic);
    }
}
