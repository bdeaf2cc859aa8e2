//! Call arguments and call-site descriptors.
//!
//! The engine never sees expressions, only what overload resolution needs
//! from them: the (non-reference) type, the value category and a few
//! shapes that change the conversion rules.

use cxx_ir::Span;

use crate::{CallFlags, Idx, Pool, RefKind, SymbolId};

/// Value category of an argument expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueCategory {
    /// Named variables, `*p`, calls returning `T&`.
    Lvalue,
    /// `std::move(x)`, `static_cast<T&&>(x)`, calls returning `T&&`.
    Xvalue,
    /// Temporaries, literals, calls returning by value.
    Prvalue,
}

impl ValueCategory {
    #[inline]
    pub const fn is_lvalue(self) -> bool {
        matches!(self, ValueCategory::Lvalue)
    }

    /// Xvalues and prvalues.
    #[inline]
    pub const fn is_rvalue(self) -> bool {
        !self.is_lvalue()
    }

    pub const fn name(self) -> &'static str {
        match self {
            ValueCategory::Lvalue => "lvalue",
            ValueCategory::Xvalue => "xvalue",
            ValueCategory::Prvalue => "prvalue",
        }
    }

    /// Category of a call whose declared return type is `ret`.
    pub fn of_return(pool: &Pool, ret: Idx) -> Self {
        match pool.as_reference(ret) {
            Some((_, RefKind::Lvalue)) => ValueCategory::Lvalue,
            Some((_, RefKind::Rvalue)) => ValueCategory::Xvalue,
            None => ValueCategory::Prvalue,
        }
    }
}

/// Expression shapes with their own conversion rules.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArgShape {
    Plain,
    /// `0`, `NULL` or `nullptr`.
    NullPointerConstant,
    /// A narrow or wide string literal (array of const char type).
    StringLiteral,
    /// A braced initializer list.
    InitList(Vec<Arg>),
}

/// One argument of a call.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Arg {
    /// The expression type. Never a reference.
    pub ty: Idx,
    pub category: ValueCategory,
    pub shape: ArgShape,
}

impl Arg {
    pub fn new(ty: Idx, category: ValueCategory) -> Self {
        Arg {
            ty,
            category,
            shape: ArgShape::Plain,
        }
    }

    pub fn lvalue(ty: Idx) -> Self {
        Self::new(ty, ValueCategory::Lvalue)
    }

    pub fn xvalue(ty: Idx) -> Self {
        Self::new(ty, ValueCategory::Xvalue)
    }

    pub fn prvalue(ty: Idx) -> Self {
        Self::new(ty, ValueCategory::Prvalue)
    }

    /// A named variable of declared type `declared` (which may be a
    /// reference; naming a reference yields an lvalue of the referee).
    pub fn named(pool: &Pool, declared: Idx) -> Self {
        Self::lvalue(pool.non_reference(declared))
    }

    /// The result of calling a function returning `ret`.
    pub fn call_result(pool: &Pool, ret: Idx) -> Self {
        Self::new(pool.non_reference(ret), ValueCategory::of_return(pool, ret))
    }

    /// `std::move(x)` on a variable of declared type `declared`.
    pub fn moved(pool: &Pool, declared: Idx) -> Self {
        Self::xvalue(pool.non_reference(declared))
    }

    /// The literal `nullptr`.
    pub fn nullptr() -> Self {
        Arg {
            ty: Idx::NULLPTR,
            category: ValueCategory::Prvalue,
            shape: ArgShape::NullPointerConstant,
        }
    }

    /// The literal `0` used as a null pointer constant.
    pub fn null_literal() -> Self {
        Arg {
            ty: Idx::INT,
            category: ValueCategory::Prvalue,
            shape: ArgShape::NullPointerConstant,
        }
    }

    /// A string literal of `len` characters (plus the terminator).
    pub fn string_literal(pool: &mut Pool, len: u64) -> Self {
        let elem = pool.const_of(Idx::CHAR);
        Arg {
            ty: pool.array(elem, Some(len + 1)),
            category: ValueCategory::Lvalue,
            shape: ArgShape::StringLiteral,
        }
    }

    /// A braced initializer list.
    pub fn init_list(elems: Vec<Arg>) -> Self {
        Arg {
            ty: Idx::VOID,
            category: ValueCategory::Prvalue,
            shape: ArgShape::InitList(elems),
        }
    }

    pub fn is_init_list(&self) -> bool {
        matches!(self.shape, ArgShape::InitList(_))
    }

    pub fn is_null_pointer_constant(&self) -> bool {
        matches!(self.shape, ArgShape::NullPointerConstant)
    }

    /// The same expression treated as an xvalue.
    #[must_use]
    pub fn as_xvalue(&self) -> Self {
        Arg {
            category: ValueCategory::Xvalue,
            ..self.clone()
        }
    }
}

/// Everything overload resolution needs about a call site.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallDescriptor {
    pub args: Vec<Arg>,
    /// Implicit object argument of a member call (`obj.f(...)`).
    pub object: Option<Arg>,
    pub explicit_template_args: Vec<Idx>,
    pub flags: CallFlags,
    pub span: Span,
    /// Class whose member code contains the call, for access checks.
    pub access_from: Option<SymbolId>,
}

impl CallDescriptor {
    /// An ordinary call `f(args)`.
    pub fn new(args: Vec<Arg>) -> Self {
        CallDescriptor {
            args,
            object: None,
            explicit_template_args: Vec::new(),
            flags: CallFlags::ORDINARY,
            span: Span::DUMMY,
            access_from: None,
        }
    }

    /// Constructor call for direct-initialization `T x(args)`.
    pub fn construct(args: Vec<Arg>) -> Self {
        CallDescriptor {
            flags: CallFlags::DIRECT_INIT,
            ..Self::new(args)
        }
    }

    #[must_use]
    pub fn with_object(mut self, object: Arg) -> Self {
        self.object = Some(object);
        self
    }

    #[must_use]
    pub fn with_template_args(mut self, args: Vec<Idx>) -> Self {
        self.explicit_template_args = args;
        self.flags |= CallFlags::EXPLICIT_TEMPLATE;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CallFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn without_flags(mut self, flags: CallFlags) -> Self {
        self.flags -= flags;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn from_class(mut self, class: SymbolId) -> Self {
        self.access_from = Some(class);
        self
    }

    pub fn is_probe(&self) -> bool {
        self.flags.is_probe()
    }
}
