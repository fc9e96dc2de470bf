//! Packet types for decoded BITS transmissions.

use std::fmt;

/// Type id reserved for literal packets.
pub const LITERAL_TYPE_ID: u8 = 4;

/// Operation carried by an operator packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Sum,
    Product,
    Minimum,
    Maximum,
    GreaterThan,
    LessThan,
    Equals,
}

impl OperatorKind {
    /// All operator kinds, in type id order.
    pub const ALL: [OperatorKind; 7] = [
        OperatorKind::Sum,
        OperatorKind::Product,
        OperatorKind::Minimum,
        OperatorKind::Maximum,
        OperatorKind::GreaterThan,
        OperatorKind::LessThan,
        OperatorKind::Equals,
    ];

    /// Returns the wire type id.
    pub fn type_id(self) -> u8 {
        match self {
            OperatorKind::Sum => 0,
            OperatorKind::Product => 1,
            OperatorKind::Minimum => 2,
            OperatorKind::Maximum => 3,
            OperatorKind::GreaterThan => 5,
            OperatorKind::LessThan => 6,
            OperatorKind::Equals => 7,
        }
    }

    /// Returns the operand count the operator requires, if fixed.
    pub fn arity(self) -> Option<usize> {
        match self {
            OperatorKind::GreaterThan | OperatorKind::LessThan | OperatorKind::Equals => Some(2),
            _ => None,
        }
    }

    /// Returns the lower-case operator name.
    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Sum => "sum",
            OperatorKind::Product => "product",
            OperatorKind::Minimum => "minimum",
            OperatorKind::Maximum => "maximum",
            OperatorKind::GreaterThan => "greater_than",
            OperatorKind::LessThan => "less_than",
            OperatorKind::Equals => "equals",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a packet header's type id announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    Literal,
    Operator(OperatorKind),
}

impl PacketType {
    /// Maps a wire type id to its packet type.
    pub fn from_u8(type_id: u8) -> Option<Self> {
        match type_id {
            0 => Some(PacketType::Operator(OperatorKind::Sum)),
            1 => Some(PacketType::Operator(OperatorKind::Product)),
            2 => Some(PacketType::Operator(OperatorKind::Minimum)),
            3 => Some(PacketType::Operator(OperatorKind::Maximum)),
            LITERAL_TYPE_ID => Some(PacketType::Literal),
            5 => Some(PacketType::Operator(OperatorKind::GreaterThan)),
            6 => Some(PacketType::Operator(OperatorKind::LessThan)),
            7 => Some(PacketType::Operator(OperatorKind::Equals)),
            _ => None,
        }
    }

    /// Returns the wire type id.
    pub fn type_id(self) -> u8 {
        match self {
            PacketType::Literal => LITERAL_TYPE_ID,
            PacketType::Operator(kind) => kind.type_id(),
        }
    }
}

/// A decoded packet: a literal value or an operator over nested packets.
///
/// Trees are built once by the decoder and not mutated afterwards. Dropping a
/// tree is iterative; the derived `Clone`, `PartialEq` and `Debug` and the
/// `Display` impl recurse once per nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal {
        /// 3-bit version field.
        version: u8,
        value: u64,
    },
    Operator {
        /// 3-bit version field.
        version: u8,
        kind: OperatorKind,
        /// Subpackets in wire order.
        operands: Vec<Packet>,
    },
}

impl Packet {
    /// Creates a literal packet.
    pub fn literal(version: u8, value: u64) -> Self {
        Packet::Literal { version, value }
    }

    /// Creates an operator packet.
    pub fn operator(version: u8, kind: OperatorKind, operands: Vec<Packet>) -> Self {
        Packet::Operator {
            version,
            kind,
            operands,
        }
    }

    /// Returns the version field.
    pub fn version(&self) -> u8 {
        match self {
            Packet::Literal { version, .. } | Packet::Operator { version, .. } => *version,
        }
    }

    /// Returns the packet type announced in the header.
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Literal { .. } => PacketType::Literal,
            Packet::Operator { kind, .. } => PacketType::Operator(*kind),
        }
    }

    /// Returns the wire type id.
    pub fn type_id(&self) -> u8 {
        self.packet_type().type_id()
    }

    /// Returns the operands; empty for literals.
    pub fn operands(&self) -> &[Packet] {
        match self {
            Packet::Literal { .. } => &[],
            Packet::Operator { operands, .. } => operands,
        }
    }

    /// Returns true for literal packets.
    pub fn is_literal(&self) -> bool {
        matches!(self, Packet::Literal { .. })
    }

    /// Counts every packet in the tree, this one included.
    pub fn packet_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(packet) = stack.pop() {
            count += 1;
            stack.extend(packet.operands());
        }
        count
    }

    /// Returns the nesting depth; a lone literal has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((packet, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(packet.operands().iter().map(|operand| (operand, depth + 1)));
        }
        deepest
    }
}

/// Drops nested operands from a heap stack instead of recursing per level.
impl Drop for Packet {
    fn drop(&mut self) {
        let Packet::Operator { operands, .. } = self else {
            return;
        };
        if operands.iter().all(Packet::is_literal) {
            return;
        }
        let mut pending = std::mem::take(operands);
        while let Some(mut packet) = pending.pop() {
            if let Packet::Operator { operands, .. } = &mut packet {
                pending.append(operands);
            }
        }
    }
}

/// Renders the tree as an expression, e.g. `sum(1, product(2, 3))`.
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Literal { value, .. } => write!(f, "{}", value),
            Packet::Operator { kind, operands, .. } => {
                write!(f, "{}(", kind)?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}
