//! Top-level entitlement marshalling.
//!
//! On-chain entitlement modules expose their state as a type tag plus an
//! opaque ABI-encoded payload; this module dispatches on the tag and decodes
//! the payload into a typed entitlement.

use crate::error::EntitlementError;
use crate::migrate::upgrade_rule_data;
use crate::operation_tree::{operation_tree, OperationNode};
use crate::rule_data::{RuleData, RuleDataV2};
use alloy_primitives::Address;
use alloy_sol_types::{sol, SolValue};
use tracing::warn;

pub const MODULE_TYPE_RULE_ENTITLEMENT: &str = "RuleEntitlement";
pub const MODULE_TYPE_RULE_ENTITLEMENT_V2: &str = "RuleEntitlementV2";
pub const MODULE_TYPE_USER_ENTITLEMENT: &str = "UserEntitlement";

sol! {
    struct EntitlementData {
        string entitlementType;
        bytes entitlementData;
    }
}

/// A decoded on-chain entitlement: a rule-based predicate (V1 or V2 schema)
/// or a plain allow-list of addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlement {
    RuleV1(RuleData),
    RuleV2(RuleDataV2),
    User(Vec<Address>),
}

impl Entitlement {
    pub fn from_wire(raw: &EntitlementData) -> Result<Entitlement, EntitlementError> {
        marshal_entitlement(&raw.entitlementType, &raw.entitlementData)
    }

    /// Decodes the rule data into an operation tree, migrating V1 data to
    /// the V2 schema first. User entitlements carry no tree.
    pub fn operation_tree(&self) -> Result<Option<OperationNode>, EntitlementError> {
        match self {
            Entitlement::RuleV1(rule_data) => {
                let upgraded = upgrade_rule_data(rule_data)?;
                operation_tree(&upgraded).map(Some)
            }
            Entitlement::RuleV2(rule_data) => operation_tree(rule_data).map(Some),
            Entitlement::User(_) => Ok(None),
        }
    }
}

/// Decodes an entitlement payload according to its type tag.
///
/// Legacy special case: rule entitlement modules with no rule data set have
/// historically returned zero bytes instead of an encoded empty struct, and
/// callers depend on treating that as empty rule data rather than an error.
/// Any other undecodable payload is an error.
pub fn marshal_entitlement(
    entitlement_type: &str,
    data: &[u8],
) -> Result<Entitlement, EntitlementError> {
    match entitlement_type {
        MODULE_TYPE_RULE_ENTITLEMENT => {
            if data.is_empty() {
                warn!(entitlement_type, "empty entitlement data, decoding as empty rule data");
                return Ok(Entitlement::RuleV1(RuleData::empty()));
            }
            let rule_data = RuleData::abi_decode(data)
                .map_err(|e| EntitlementError::EntitlementDataDecodingFailed(e.to_string()))?;
            Ok(Entitlement::RuleV1(rule_data))
        }
        MODULE_TYPE_RULE_ENTITLEMENT_V2 => {
            if data.is_empty() {
                warn!(entitlement_type, "empty entitlement data, decoding as empty rule data");
                return Ok(Entitlement::RuleV2(RuleDataV2::empty()));
            }
            let rule_data = RuleDataV2::abi_decode(data)
                .map_err(|e| EntitlementError::EntitlementDataDecodingFailed(e.to_string()))?;
            Ok(Entitlement::RuleV2(rule_data))
        }
        MODULE_TYPE_USER_ENTITLEMENT => {
            let addresses = <Vec<Address>>::abi_decode(data)
                .map_err(|e| EntitlementError::EntitlementDataDecodingFailed(e.to_string()))?;
            Ok(Entitlement::User(addresses))
        }
        other => Err(EntitlementError::InvalidEntitlementType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ThresholdParams;
    use crate::rule_data::{
        CheckOperation, CheckOperationType, CheckOperationV2, LogicalOperation,
        LogicalOperationType, Operation, OperationType,
    };
    use alloy_primitives::{Bytes, U256};

    fn rule_data_v1() -> RuleData {
        RuleData {
            operations: vec![Operation {
                opType: OperationType::Check as u8,
                index: 0,
            }],
            checkOperations: vec![CheckOperation {
                opType: CheckOperationType::Erc721 as u8,
                chainId: U256::from(1),
                contractAddress: Address::repeat_byte(0x22),
                threshold: U256::from(10),
            }],
            logicalOperations: vec![],
        }
    }

    fn rule_data_v2() -> RuleDataV2 {
        let params = Bytes::from(
            ThresholdParams {
                threshold: U256::from(10),
            }
            .encode(),
        );
        RuleDataV2 {
            operations: vec![
                Operation {
                    opType: OperationType::Check as u8,
                    index: 0,
                },
                Operation {
                    opType: OperationType::Check as u8,
                    index: 1,
                },
                Operation {
                    opType: OperationType::Logical as u8,
                    index: 0,
                },
            ],
            checkOperations: vec![
                CheckOperationV2 {
                    opType: CheckOperationType::Erc20 as u8,
                    chainId: U256::from(1),
                    contractAddress: Address::repeat_byte(0x33),
                    params: params.clone(),
                },
                CheckOperationV2 {
                    opType: CheckOperationType::Erc721 as u8,
                    chainId: U256::from(8453),
                    contractAddress: Address::repeat_byte(0x44),
                    params,
                },
            ],
            logicalOperations: vec![LogicalOperation {
                logOpType: LogicalOperationType::And as u8,
                leftOperationIndex: 0,
                rightOperationIndex: 1,
            }],
        }
    }

    #[test]
    fn user_entitlement_preserves_address_order() {
        let addresses = vec![
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            Address::repeat_byte(0x03),
        ];
        let encoded = addresses.abi_encode();

        let entitlement = marshal_entitlement(MODULE_TYPE_USER_ENTITLEMENT, &encoded).unwrap();
        let Entitlement::User(decoded) = entitlement else {
            panic!("expected a user entitlement");
        };
        assert_eq!(decoded, addresses);
    }

    #[test]
    fn user_entitlement_decodes_the_raw_wire_format() {
        // abi.encode(address[]): head offset, length, right-aligned items.
        let encoded = hex::decode(concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000001111111111111111111111111111111111111111",
            "0000000000000000000000002222222222222222222222222222222222222222",
        ))
        .unwrap();

        let entitlement = marshal_entitlement(MODULE_TYPE_USER_ENTITLEMENT, &encoded).unwrap();
        assert_eq!(
            entitlement,
            Entitlement::User(vec![
                Address::repeat_byte(0x11),
                Address::repeat_byte(0x22),
            ])
        );
    }

    #[test]
    fn rule_entitlement_v1_round_trips() {
        let rule_data = rule_data_v1();
        let encoded = rule_data.abi_encode();

        let entitlement = marshal_entitlement(MODULE_TYPE_RULE_ENTITLEMENT, &encoded).unwrap();
        let Entitlement::RuleV1(decoded) = entitlement else {
            panic!("expected a V1 rule entitlement");
        };
        assert_eq!(decoded.operations.len(), 1);
        assert_eq!(decoded.checkOperations.len(), 1);
        assert_eq!(decoded.checkOperations[0].threshold, U256::from(10));
        assert_eq!(
            decoded.checkOperations[0].contractAddress,
            Address::repeat_byte(0x22)
        );
    }

    #[test]
    fn rule_entitlement_v2_round_trips() {
        let rule_data = rule_data_v2();
        let encoded = rule_data.abi_encode();

        let entitlement = marshal_entitlement(MODULE_TYPE_RULE_ENTITLEMENT_V2, &encoded).unwrap();
        let Entitlement::RuleV2(decoded) = entitlement else {
            panic!("expected a V2 rule entitlement");
        };
        assert_eq!(decoded.operations.len(), 3);
        assert_eq!(decoded.checkOperations.len(), 2);
        assert_eq!(decoded.logicalOperations.len(), 1);
        assert_eq!(decoded.checkOperations[0].params.len(), 32);
    }

    #[test]
    fn empty_rule_data_is_decoded_as_empty() {
        // Legacy behavior: zero bytes from a rule entitlement module decode
        // to empty rule data, not an error.
        let entitlement = marshal_entitlement(MODULE_TYPE_RULE_ENTITLEMENT, &[]).unwrap();
        let Entitlement::RuleV1(decoded) = entitlement else {
            panic!("expected a V1 rule entitlement");
        };
        assert!(decoded.operations.is_empty());
        assert!(decoded.checkOperations.is_empty());
        assert!(decoded.logicalOperations.is_empty());

        let entitlement = marshal_entitlement(MODULE_TYPE_RULE_ENTITLEMENT_V2, &[]).unwrap();
        let Entitlement::RuleV2(decoded) = entitlement else {
            panic!("expected a V2 rule entitlement");
        };
        assert!(decoded.operations.is_empty());
    }

    #[test]
    fn undecodable_rule_data_is_an_error() {
        let garbage = vec![0xffu8; 7];
        assert!(matches!(
            marshal_entitlement(MODULE_TYPE_RULE_ENTITLEMENT, &garbage),
            Err(EntitlementError::EntitlementDataDecodingFailed(_))
        ));
        assert!(matches!(
            marshal_entitlement(MODULE_TYPE_USER_ENTITLEMENT, &garbage),
            Err(EntitlementError::EntitlementDataDecodingFailed(_))
        ));
    }

    #[test]
    fn unknown_entitlement_type_is_rejected() {
        assert_eq!(
            marshal_entitlement("TokenEntitlement", &[]),
            Err(EntitlementError::InvalidEntitlementType(
                "TokenEntitlement".to_string()
            ))
        );
    }

    #[test]
    fn v1_entitlement_builds_a_tree_through_migration() {
        let encoded = rule_data_v1().abi_encode();
        let entitlement = marshal_entitlement(MODULE_TYPE_RULE_ENTITLEMENT, &encoded).unwrap();

        let root = entitlement.operation_tree().unwrap().unwrap();
        let OperationNode::Check(check) = root else {
            panic!("expected a single check leaf");
        };
        assert_eq!(check.check_type, CheckOperationType::Erc721);
        assert_eq!(
            check.params,
            Bytes::from(
                ThresholdParams {
                    threshold: U256::from(10)
                }
                .encode()
            )
        );
    }

    #[test]
    fn from_wire_dispatches_on_the_tag() {
        let addresses = vec![Address::repeat_byte(0x05)];
        let raw = EntitlementData {
            entitlementType: MODULE_TYPE_USER_ENTITLEMENT.to_string(),
            entitlementData: addresses.abi_encode().into(),
        };
        let Entitlement::User(decoded) = Entitlement::from_wire(&raw).unwrap() else {
            panic!("expected a user entitlement");
        };
        assert_eq!(decoded, addresses);
    }
}
