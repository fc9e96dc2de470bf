//! Evaluation of decoded packet trees.
//!
//! Both walks run on explicit work stacks, so the depth of a tree is limited
//! by memory rather than by the call stack.

use crate::codec::decode;
use crate::error::{Error, EvalError};
use crate::model::{OperatorKind, Packet};

/// Sums the version field of every packet in the tree.
pub fn version_sum(packet: &Packet) -> u64 {
    let mut sum = 0;
    let mut pending = vec![packet];
    while let Some(packet) = pending.pop() {
        sum += u64::from(packet.version());
        pending.extend(packet.operands());
    }
    sum
}

/// A unit of pending work for [`evaluate`].
enum Task<'a> {
    /// Evaluate a packet, pushing its value.
    Visit(&'a Packet),
    /// Combine the top `count` values with an operator.
    Apply(OperatorKind, usize),
}

/// Computes the value of the expression the tree encodes.
///
/// | kind | value |
/// |---|---|
/// | literal | stored value |
/// | sum | sum of operands, `0` when empty |
/// | product | product of operands, `0` when empty |
/// | minimum / maximum | extreme operand; empty is an error |
/// | greater_than / less_than / equals | `1` or `0` over exactly two operands |
///
/// Arithmetic is checked: literals above `i64::MAX` and overflowing sums or
/// products are errors, never wrapped.
pub fn evaluate(packet: &Packet) -> Result<i64, EvalError> {
    let mut tasks = vec![Task::Visit(packet)];
    let mut values: Vec<i64> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(Packet::Literal { value, .. }) => {
                let value = i64::try_from(*value)
                    .map_err(|_| EvalError::ValueOutOfRange { value: *value })?;
                values.push(value);
            }
            Task::Visit(Packet::Operator { kind, operands, .. }) => {
                check_operand_count(*kind, operands.len())?;
                tasks.push(Task::Apply(*kind, operands.len()));
                // Reversed so the first operand is evaluated first.
                tasks.extend(operands.iter().rev().map(Task::Visit));
            }
            Task::Apply(kind, count) => {
                let start = values.len() - count;
                let result = apply(kind, &values[start..])?;
                values.truncate(start);
                values.push(result);
            }
        }
    }

    // SAFETY: the root task always leaves exactly one value behind
    Ok(values.pop().unwrap())
}

/// Decodes a hex transmission and sums its versions.
pub fn version_sum_hex(hex: &str) -> Result<u64, Error> {
    Ok(version_sum(&decode(hex)?))
}

/// Decodes a hex transmission and evaluates it.
pub fn evaluate_hex(hex: &str) -> Result<i64, Error> {
    Ok(evaluate(&decode(hex)?)?)
}

fn check_operand_count(kind: OperatorKind, actual: usize) -> Result<(), EvalError> {
    if let Some(expected) = kind.arity() {
        if actual != expected {
            return Err(EvalError::ArityViolation {
                kind,
                expected,
                actual,
            });
        }
    }
    if actual == 0 && matches!(kind, OperatorKind::Minimum | OperatorKind::Maximum) {
        return Err(EvalError::EmptyOperandList { kind });
    }
    Ok(())
}

fn apply(kind: OperatorKind, operands: &[i64]) -> Result<i64, EvalError> {
    let overflow = || EvalError::ArithmeticOverflow { kind };
    match kind {
        OperatorKind::Sum => operands
            .iter()
            .try_fold(0i64, |acc, &value| acc.checked_add(value))
            .ok_or_else(overflow),
        // An empty product is 0, not the multiplicative identity.
        OperatorKind::Product if operands.is_empty() => Ok(0),
        OperatorKind::Product => operands
            .iter()
            .try_fold(1i64, |acc, &value| acc.checked_mul(value))
            .ok_or_else(overflow),
        OperatorKind::Minimum => operands
            .iter()
            .copied()
            .min()
            .ok_or(EvalError::EmptyOperandList { kind }),
        OperatorKind::Maximum => operands
            .iter()
            .copied()
            .max()
            .ok_or(EvalError::EmptyOperandList { kind }),
        OperatorKind::GreaterThan => compare(kind, operands, |left, right| left > right),
        OperatorKind::LessThan => compare(kind, operands, |left, right| left < right),
        OperatorKind::Equals => compare(kind, operands, |left, right| left == right),
    }
}

fn compare(
    kind: OperatorKind,
    operands: &[i64],
    holds: fn(i64, i64) -> bool,
) -> Result<i64, EvalError> {
    match operands {
        [left, right] => Ok(i64::from(holds(*left, *right))),
        _ => Err(EvalError::ArityViolation {
            kind,
            expected: 2,
            actual: operands.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    fn lit(value: u64) -> Packet {
        Packet::literal(0, value)
    }

    fn op(kind: OperatorKind, operands: Vec<Packet>) -> Packet {
        Packet::operator(0, kind, operands)
    }

    #[test]
    fn test_version_sum_scenarios() {
        let cases = [
            ("8A004A801A8002F478", 16),
            ("620080001611562C8802118E34", 12),
            ("C0015000016115A2E0802F182340", 23),
            ("A0016C880162017C3686B18A3D4780", 31),
        ];
        for (hex, expected) in cases {
            assert_eq!(version_sum_hex(hex).unwrap(), expected, "failed for {}", hex);
        }
    }

    #[test]
    fn test_evaluate_scenarios() {
        let cases = [
            ("C200B40A82", 3),
            ("04005AC33890", 54),
            ("880086C3E88112", 7),
            ("CE00C43D881120", 9),
            ("D8005AC2A8F0", 1),
            ("F600BC2D8F", 0),
            ("9C005AC2F8F0", 0),
            ("9C0141080250320F1802104A08", 1),
        ];
        for (hex, expected) in cases {
            assert_eq!(evaluate_hex(hex).unwrap(), expected, "failed for {}", hex);
        }
    }

    #[test]
    fn test_walks_are_independent() {
        let packet = decode("9C0141080250320F1802104A08").unwrap();
        let value = evaluate(&packet).unwrap();
        let sum = version_sum(&packet);
        assert_eq!(evaluate(&packet).unwrap(), value);
        assert_eq!(version_sum(&packet), sum);
        assert_eq!(evaluate(&packet).unwrap(), value);
    }

    #[test]
    fn test_version_sum_literal() {
        assert_eq!(version_sum(&Packet::literal(6, 2021)), 6);
    }

    #[test]
    fn test_empty_sum_and_product() {
        assert_eq!(evaluate(&op(OperatorKind::Sum, vec![])).unwrap(), 0);
        assert_eq!(evaluate(&op(OperatorKind::Product, vec![])).unwrap(), 0);
    }

    #[test]
    fn test_empty_min_max() {
        for kind in [OperatorKind::Minimum, OperatorKind::Maximum] {
            assert_eq!(
                evaluate(&op(kind, vec![])).unwrap_err(),
                EvalError::EmptyOperandList { kind }
            );
        }
    }

    #[test]
    fn test_empty_operands_from_wire() {
        // Count-framed operators with N = 0: sum, product, minimum, maximum.
        assert_eq!(evaluate_hex("02000").unwrap(), 0);
        assert_eq!(evaluate_hex("06000").unwrap(), 0);
        assert_eq!(
            evaluate_hex("0A000").unwrap_err(),
            Error::Eval(EvalError::EmptyOperandList {
                kind: OperatorKind::Minimum
            })
        );
        assert_eq!(
            evaluate_hex("0E000").unwrap_err(),
            Error::Eval(EvalError::EmptyOperandList {
                kind: OperatorKind::Maximum
            })
        );
    }

    #[test]
    fn test_single_operand_product() {
        assert_eq!(evaluate(&op(OperatorKind::Product, vec![lit(7)])).unwrap(), 7);
    }

    #[test]
    fn test_comparison_arity() {
        for kind in [OperatorKind::GreaterThan, OperatorKind::LessThan, OperatorKind::Equals] {
            for count in [0usize, 1, 3] {
                let packet = op(kind, (0..count as u64).map(lit).collect());
                assert_eq!(
                    evaluate(&packet).unwrap_err(),
                    EvalError::ArityViolation {
                        kind,
                        expected: 2,
                        actual: count,
                    }
                );
            }
        }
    }

    #[test]
    fn test_comparisons() {
        let cmp = |kind, a, b| evaluate(&op(kind, vec![lit(a), lit(b)])).unwrap();
        assert_eq!(cmp(OperatorKind::GreaterThan, 3, 2), 1);
        assert_eq!(cmp(OperatorKind::GreaterThan, 2, 2), 0);
        assert_eq!(cmp(OperatorKind::LessThan, 2, 3), 1);
        assert_eq!(cmp(OperatorKind::LessThan, 3, 3), 0);
        assert_eq!(cmp(OperatorKind::Equals, 4, 4), 1);
        assert_eq!(cmp(OperatorKind::Equals, 4, 5), 0);
    }

    #[test]
    fn test_nested_expression() {
        // max(1 + 2, 2 * 5, min(9, 4)) = 10
        let packet = op(
            OperatorKind::Maximum,
            vec![
                op(OperatorKind::Sum, vec![lit(1), lit(2)]),
                op(OperatorKind::Product, vec![lit(2), lit(5)]),
                op(OperatorKind::Minimum, vec![lit(9), lit(4)]),
            ],
        );
        assert_eq!(evaluate(&packet).unwrap(), 10);
    }

    #[test]
    fn test_arity_error_inside_tree() {
        let packet = op(
            OperatorKind::Sum,
            vec![lit(1), op(OperatorKind::Equals, vec![lit(1)])],
        );
        assert!(matches!(
            evaluate(&packet),
            Err(EvalError::ArityViolation { actual: 1, .. })
        ));
    }

    #[test]
    fn test_literal_out_of_range() {
        let big = i64::MAX as u64 + 1;
        assert_eq!(
            evaluate(&lit(big)).unwrap_err(),
            EvalError::ValueOutOfRange { value: big }
        );
        assert_eq!(evaluate(&lit(i64::MAX as u64)).unwrap(), i64::MAX);
    }

    #[test]
    fn test_top_bit_literal_from_wire() {
        // Literal 0x8000_0000_0000_0000: decodes, but does not fit i64.
        let packet = decode("1310842108421084210800").unwrap();
        assert_eq!(packet, Packet::literal(0, 1 << 63));
        assert_eq!(
            evaluate(&packet).unwrap_err(),
            EvalError::ValueOutOfRange { value: 1 << 63 }
        );
        assert_eq!(
            evaluate_hex("1310842108421084210800").unwrap_err().code(),
            crate::error::ErrorCode::NumericRange
        );
    }

    #[test]
    fn test_arithmetic_overflow() {
        let max = i64::MAX as u64;
        assert_eq!(
            evaluate(&op(OperatorKind::Sum, vec![lit(max), lit(1)])).unwrap_err(),
            EvalError::ArithmeticOverflow {
                kind: OperatorKind::Sum
            }
        );
        assert_eq!(
            evaluate(&op(OperatorKind::Product, vec![lit(max), lit(2)])).unwrap_err(),
            EvalError::ArithmeticOverflow {
                kind: OperatorKind::Product
            }
        );
    }

    #[test]
    fn test_deep_tree() {
        let mut packet = lit(5);
        for _ in 0..1000 {
            packet = Packet::operator(1, OperatorKind::Sum, vec![packet]);
        }
        assert_eq!(evaluate(&packet).unwrap(), 5);
        assert_eq!(version_sum(&packet), 1000);
    }

    #[test]
    fn test_hex_helpers_surface_decode_errors() {
        assert_eq!(
            evaluate_hex("D2FE").unwrap_err().code(),
            crate::error::ErrorCode::TruncatedStream
        );
        assert!(matches!(
            version_sum_hex("XYZ"),
            Err(Error::Decode(DecodeError::InvalidHexDigit { digit: 'X', index: 0 }))
        ));
    }
}
