//! Value identity, type tags and the group index convention.

use serde::{Deserialize, Serialize};

// ============================================================================
// Value Identity
// ============================================================================

/// The unique key of a value.
///
/// Two values with the same id are the same setting; the store never holds
/// more than one entry per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId {
    /// Network (home) identifier.
    pub home_id: u32,
    /// Node the value belongs to.
    pub node_id: u8,
    /// Endpoint instance on the node (1-based).
    pub instance: u8,
    /// Command class that owns the value.
    pub command_class_id: u8,
    /// Command-class specific index.
    pub index: u8,
}

impl ValueId {
    /// Create a new value id.
    pub const fn new(home_id: u32, node_id: u8, instance: u8, command_class_id: u8, index: u8) -> Self {
        Self {
            home_id,
            node_id,
            instance,
            command_class_id,
            index,
        }
    }

    /// The id of another value of the same node, instance and command class.
    pub const fn with_index(&self, index: u8) -> Self {
        Self { index, ..*self }
    }

    /// Decode the index as a [`GroupIndex`].
    pub const fn group_index(&self) -> GroupIndex {
        GroupIndex::decode(self.index)
    }
}

impl std::fmt::Display for ValueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "0x{:08X}/node {}/instance {}/class 0x{:02X}/index {}",
            self.home_id, self.node_id, self.instance, self.command_class_id, self.index
        )
    }
}

// ============================================================================
// Value Type and Genre
// ============================================================================

/// The semantic type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Boolean flag.
    Bool,
    /// 8-bit unsigned integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// Text.
    String,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Byte => write!(f, "byte"),
            ValueType::Short => write!(f, "short"),
            ValueType::Int => write!(f, "int"),
            ValueType::String => write!(f, "string"),
        }
    }
}

/// Who a value is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueGenre {
    /// Basic values an ordinary application shows (on/off, level).
    Basic,
    /// Values a user may want to change.
    User,
    /// Device configuration parameters.
    Config,
    /// Values only needed by setup tools.
    System,
}

impl std::fmt::Display for ValueGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueGenre::Basic => write!(f, "basic"),
            ValueGenre::User => write!(f, "user"),
            ValueGenre::Config => write!(f, "config"),
            ValueGenre::System => write!(f, "system"),
        }
    }
}

// ============================================================================
// Group Index
// ============================================================================

/// Bits the field occupies at the bottom of a grouped index.
pub const GROUP_SHIFT: u8 = 1;

/// Mask selecting the field of a grouped index.
pub const FIELD_MASK: u8 = 0x1;

/// Highest group addressable with a one-bit field in an 8-bit index.
pub const MAX_GROUP: u8 = u8::MAX >> GROUP_SHIFT;

/// A value index split into a group and a field within that group.
///
/// Families with repeated per-group sub-values pack both into one index:
///
/// ```text
/// index = (group << 1) | field
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIndex {
    /// Group number (1-based on the wire).
    pub group: u8,
    /// Field within the group (0 or 1).
    pub field: u8,
}

impl GroupIndex {
    /// Create a group index. The field is masked to its single bit.
    pub const fn new(group: u8, field: u8) -> Self {
        Self {
            group,
            field: field & FIELD_MASK,
        }
    }

    /// Pack into a value index.
    pub const fn encode(&self) -> u8 {
        (self.group << GROUP_SHIFT) | (self.field & FIELD_MASK)
    }

    /// Unpack a value index.
    pub const fn decode(index: u8) -> Self {
        Self {
            group: index >> GROUP_SHIFT,
            field: index & FIELD_MASK,
        }
    }
}

impl From<GroupIndex> for u8 {
    fn from(index: GroupIndex) -> Self {
        index.encode()
    }
}
