/// Range-condition predicates over the pad attribute.
///
/// Conditional dialogue is gated by small hand-authored condition strings
/// in one of three surface forms, tried in fixed priority order:
///
/// 1. inequality — `pad >= 5`, `pad < -inf`
/// 2. interval   — `[0, 5]`, `(-10, 10)`, `(5, inf)`
/// 3. membership — `∈ (-∞, 20)` (legacy one-sided form, value < bound)
///
/// The first matcher whose surface syntax matches wins, even if the
/// matched form is degenerate. A string matching no form yields a
/// predicate that is false for every value, plus a diagnostic; parsing
/// never fails the caller because story content must not crash a session.
use std::sync::OnceLock;

use regex::Regex;

use crate::core::diagnostics::{Diagnostic, DiagnosticsSink};

/// Bound token vocabulary shared by all three forms: an optionally signed
/// decimal number, `inf`, or `∞`.
const BOUND_TOKEN: &str = r"[+-]?(?:\d+(?:\.\d+)?|inf|∞)";

fn inequality_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*pad\s*(>=|<=|>|<)\s*({BOUND_TOKEN})\s*$"))
            .expect("inequality regex must compile")
    })
}

fn interval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*([\[(])\s*({BOUND_TOKEN})\s*,\s*({BOUND_TOKEN})\s*([\])])\s*$"
        ))
        .expect("interval regex must compile")
    })
}

fn membership_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*∈\s*\(\s*-(?:inf|∞)\s*,\s*({BOUND_TOKEN})\s*\)\s*$"
        ))
        .expect("membership regex must compile")
    })
}

/// Parse a bound token. Infinite tokens map to the f64 infinities; any
/// failure is a structural non-match for the matcher that produced it.
fn parse_bound(token: &str) -> Option<f64> {
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let magnitude = if rest == "inf" || rest == "∞" {
        f64::INFINITY
    } else {
        rest.parse::<f64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Comparison operator for the inequality form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            CmpOp::Gt => value > bound,
            CmpOp::Ge => value >= bound,
            CmpOp::Lt => value < bound,
            CmpOp::Le => value <= bound,
        }
    }
}

/// One end of an interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub closed: bool,
}

/// A parsed, canonical range condition. Pure: evaluating it never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// One-sided comparison (inequality and membership forms).
    Compare { op: CmpOp, bound: f64 },
    /// Two-sided interval; both ends must hold.
    Between { left: Bound, right: Bound },
    /// Unparsable input; false for every value.
    Never,
}

impl Predicate {
    /// Parse a condition string, trying the three surface forms in
    /// priority order. Unparsable input degrades to [`Predicate::Never`]
    /// with a [`Diagnostic::UnparsablePredicate`] record.
    pub fn parse(raw: &str, sink: &mut DiagnosticsSink) -> Predicate {
        if let Some(p) = Self::match_inequality(raw) {
            return p;
        }
        if let Some(p) = Self::match_interval(raw) {
            return p;
        }
        if let Some(p) = Self::match_membership(raw) {
            return p;
        }
        sink.report(Diagnostic::UnparsablePredicate {
            raw: raw.to_string(),
        });
        Predicate::Never
    }

    fn match_inequality(raw: &str) -> Option<Predicate> {
        let caps = inequality_re().captures(raw)?;
        let op = match &caps[1] {
            ">=" => CmpOp::Ge,
            "<=" => CmpOp::Le,
            ">" => CmpOp::Gt,
            _ => CmpOp::Lt,
        };
        let bound = parse_bound(&caps[2])?;
        Some(Predicate::Compare { op, bound })
    }

    fn match_interval(raw: &str) -> Option<Predicate> {
        let caps = interval_re().captures(raw)?;
        let left = Bound {
            value: parse_bound(&caps[2])?,
            closed: &caps[1] == "[",
        };
        let right = Bound {
            value: parse_bound(&caps[3])?,
            closed: &caps[4] == "]",
        };
        Some(Predicate::Between { left, right })
    }

    fn match_membership(raw: &str) -> Option<Predicate> {
        let caps = membership_re().captures(raw)?;
        let bound = parse_bound(&caps[1])?;
        Some(Predicate::Compare {
            op: CmpOp::Lt,
            bound,
        })
    }

    /// Evaluate against a pad value. Total: never panics, never errors.
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Predicate::Compare { op, bound } => op.holds(value, *bound),
            Predicate::Between { left, right } => {
                let above = if left.closed {
                    value >= left.value
                } else {
                    value > left.value
                };
                let below = if right.closed {
                    value <= right.value
                } else {
                    value < right.value
                };
                above && below
            }
            Predicate::Never => false,
        }
    }
}
