//! Built-in YANG types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A built-in type of the modeling language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuiltinType {
    /// `binary`
    Binary,
    /// `bits`
    Bits,
    /// `boolean`
    Boolean,
    /// `decimal64`
    Decimal64,
    /// `empty`
    Empty,
    /// `enumeration`
    Enumeration,
    /// `identityref`
    IdentityRef,
    /// `instance-identifier`
    InstanceIdentifier,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `leafref`
    Leafref,
    /// `string`
    String,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `union`
    Union,
}

impl BuiltinType {
    /// Every built-in type.
    pub const ALL: [BuiltinType; 19] = [
        Self::Binary,
        Self::Bits,
        Self::Boolean,
        Self::Decimal64,
        Self::Empty,
        Self::Enumeration,
        Self::IdentityRef,
        Self::InstanceIdentifier,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Leafref,
        Self::String,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Union,
    ];

    /// Returns the built-in type with the given name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Returns the keyword of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::IdentityRef => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Leafref => "leafref",
            Self::String => "string",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Union => "union",
        }
    }

    /// Returns true for the integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
        )
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
