//! Legacy V1 -> V2 rule data migration.
//!
//! V1 check operations carry a single scalar threshold; V2 carries an opaque
//! params blob. Operations and logical operations are identical across the
//! two schema versions and are copied as-is.

use crate::error::EntitlementError;
use crate::params::ThresholdParams;
use crate::rule_data::{CheckOperationType, CheckOperationV2, RuleData, RuleDataV2};
use alloy_primitives::Bytes;

/// Converts V1 rule data to the V2 schema.
///
/// ERC-1155 checks cannot be represented in V1 (there is no tokenId field),
/// so encountering one is an error rather than a lossy conversion.
pub fn upgrade_rule_data(rule_data: &RuleData) -> Result<RuleDataV2, EntitlementError> {
    let mut check_operations = Vec::with_capacity(rule_data.checkOperations.len());
    for check_op in &rule_data.checkOperations {
        let params = match CheckOperationType::try_from(check_op.opType)? {
            CheckOperationType::Mock
            | CheckOperationType::Erc20
            | CheckOperationType::Erc721
            | CheckOperationType::EthBalance => Bytes::from(
                ThresholdParams {
                    threshold: check_op.threshold,
                }
                .encode(),
            ),
            CheckOperationType::Erc1155 => {
                return Err(EntitlementError::Erc1155NotSupportedInV1)
            }
            CheckOperationType::IsEntitled | CheckOperationType::None => Bytes::new(),
        };
        check_operations.push(CheckOperationV2 {
            opType: check_op.opType,
            chainId: check_op.chainId,
            contractAddress: check_op.contractAddress,
            params,
        });
    }

    Ok(RuleDataV2 {
        operations: rule_data.operations.clone(),
        checkOperations: check_operations,
        logicalOperations: rule_data.logicalOperations.clone(),
    })
}
