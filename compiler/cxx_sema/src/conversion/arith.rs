//! Arithmetic conversions: promotions, integral/floating conversions,
//! boolean conversions, unscoped enumerations.

use super::ConvKind;
use crate::{Fundamental, Idx, Pool, SymbolTable, TargetInfo};

/// Classify the arithmetic conversion from `from` to `to` (both
/// cv-unqualified). `None` when either side is not arithmetic, when the
/// source is a scoped enumeration, or when the target is an enumeration.
pub fn arithmetic_conversion(
    pool: &Pool,
    symbols: &SymbolTable,
    target: &TargetInfo,
    from: Idx,
    to: Idx,
) -> Option<ConvKind> {
    let to_f = pool.fundamental(to).filter(|f| f.is_arithmetic())?;

    let from_f = match pool.fundamental(from) {
        Some(f) if f.is_arithmetic() => f,
        Some(_) => return None,
        None => return enum_conversion(pool, symbols, target, from, to_f),
    };

    if from_f == to_f {
        return Some(ConvKind::Identity);
    }
    if to_f == Fundamental::Bool {
        return Some(ConvKind::Boolean);
    }
    if from_f.is_integral() {
        if from_f.promoted(target) == Some(to_f) {
            return Some(ConvKind::IntegralPromotion);
        }
        if to_f.is_integral() {
            return Some(integral_conversion(target, from_f, to_f));
        }
        return Some(ConvKind::FloatingIntegral);
    }
    if from_f == Fundamental::Float && to_f == Fundamental::Double {
        return Some(ConvKind::FloatingPromotion);
    }
    if to_f.is_floating() {
        return Some(ConvKind::FloatingConversion);
    }
    Some(ConvKind::FloatingIntegral)
}

/// Unscoped enumerations promote through their underlying type.
fn enum_conversion(
    pool: &Pool,
    symbols: &SymbolTable,
    target: &TargetInfo,
    from: Idx,
    to_f: Fundamental,
) -> Option<ConvKind> {
    let info = symbols.enum_info(pool.enum_of(from)?)?;
    if info.scoped {
        return None;
    }
    let fixed = info.underlying.and_then(|u| pool.fundamental(u));
    let underlying = fixed.unwrap_or(Fundamental::Int);
    let promoted = underlying.promoted(target).unwrap_or(underlying);

    if to_f == Fundamental::Bool {
        return Some(ConvKind::Boolean);
    }
    if to_f == promoted || fixed == Some(to_f) {
        return Some(ConvKind::IntegralPromotion);
    }
    if to_f.is_integral() {
        return Some(integral_conversion(target, promoted, to_f));
    }
    Some(ConvKind::FloatingIntegral)
}

fn integral_conversion(target: &TargetInfo, from: Fundamental, to: Fundamental) -> ConvKind {
    const WEAK_ELIGIBLE: [Fundamental; 4] = [
        Fundamental::Int,
        Fundamental::UInt,
        Fundamental::Long,
        Fundamental::ULong,
    ];
    let weak = target.prefer_same_width_integral
        && WEAK_ELIGIBLE.contains(&from)
        && WEAK_ELIGIBLE.contains(&to)
        && target.width(from) == target.width(to);
    if weak {
        ConvKind::IntegralConversionWeak
    } else {
        ConvKind::IntegralConversion
    }
}

/// A list-initialization conversion that may lose information.
///
/// Constant-expression exemptions are not modelled: every
/// floating-integral conversion, every floating conversion to a narrower
/// type, and every integral conversion whose target cannot represent all
/// source values narrows.
pub(crate) fn is_narrowing(target: &TargetInfo, from: Fundamental, to: Fundamental) -> bool {
    if from == to {
        return false;
    }
    if to == Fundamental::Bool {
        return from != Fundamental::Bool;
    }
    match (from.is_floating(), to.is_floating()) {
        (true, false) | (false, true) => true,
        (true, true) => target.width(to) < target.width(from),
        (false, false) => !target.represents_all(to, from),
    }
}
