//! Wire-format rule data tuples and their enum discriminants.
//!
//! The `sol!` definitions below must match the on-chain ABI exactly; the
//! enum ordinals are part of the wire format and are never renumbered.

use crate::error::EntitlementError;
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Operation {
        uint8 opType;
        uint8 index;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CheckOperation {
        uint8 opType;
        uint256 chainId;
        address contractAddress;
        uint256 threshold;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CheckOperationV2 {
        uint8 opType;
        uint256 chainId;
        address contractAddress;
        bytes params;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct LogicalOperation {
        uint8 logOpType;
        uint8 leftOperationIndex;
        uint8 rightOperationIndex;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RuleData {
        Operation[] operations;
        CheckOperation[] checkOperations;
        LogicalOperation[] logicalOperations;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RuleDataV2 {
        Operation[] operations;
        CheckOperationV2[] checkOperations;
        LogicalOperation[] logicalOperations;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperationType {
    None = 0,
    Check = 1,
    Logical = 2,
}

impl TryFrom<u8> for OperationType {
    type Error = EntitlementError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OperationType::None),
            1 => Ok(OperationType::Check),
            2 => Ok(OperationType::Logical),
            other => Err(EntitlementError::UnknownOperationType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CheckOperationType {
    None = 0,
    // Mock is a check type reserved for testing
    Mock = 1,
    Erc20 = 2,
    Erc721 = 3,
    Erc1155 = 4,
    IsEntitled = 5,
    EthBalance = 6,
}

impl CheckOperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOperationType::None => "NONE",
            CheckOperationType::Mock => "MOCK",
            CheckOperationType::Erc20 => "ERC20",
            CheckOperationType::Erc721 => "ERC721",
            CheckOperationType::Erc1155 => "ERC1155",
            CheckOperationType::IsEntitled => "ISENTITLED",
            CheckOperationType::EthBalance => "ETH_BALANCE",
        }
    }
}

impl TryFrom<u8> for CheckOperationType {
    type Error = EntitlementError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CheckOperationType::None),
            1 => Ok(CheckOperationType::Mock),
            2 => Ok(CheckOperationType::Erc20),
            3 => Ok(CheckOperationType::Erc721),
            4 => Ok(CheckOperationType::Erc1155),
            5 => Ok(CheckOperationType::IsEntitled),
            6 => Ok(CheckOperationType::EthBalance),
            other => Err(EntitlementError::UnknownCheckOperationType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum LogicalOperationType {
    None = 0,
    And = 1,
    Or = 2,
}

impl TryFrom<u8> for LogicalOperationType {
    type Error = EntitlementError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LogicalOperationType::None),
            1 => Ok(LogicalOperationType::And),
            2 => Ok(LogicalOperationType::Or),
            other => Err(EntitlementError::UnknownLogicalOperationType(other)),
        }
    }
}

impl RuleData {
    /// Rule data with no operations. Decodes to no entitlement at all, but
    /// is a legal wire value and the legacy result of unpacking empty bytes.
    pub fn empty() -> Self {
        RuleData {
            operations: Vec::new(),
            checkOperations: Vec::new(),
            logicalOperations: Vec::new(),
        }
    }
}

impl RuleDataV2 {
    pub fn empty() -> Self {
        RuleDataV2 {
            operations: Vec::new(),
            checkOperations: Vec::new(),
            logicalOperations: Vec::new(),
        }
    }
}
