//! Decoding flat rule data into an evaluable operation tree.
//!
//! The `operations` array of rule data is a post-order (operand before
//! operator) linearization of a single binary expression tree: check
//! operations are the leaves, logical operations combine the two most recent
//! subtrees. The builder reduces the sequence with a stack; the declared
//! `leftOperationIndex`/`rightOperationIndex` of a logical operation do not
//! influence the resulting shape unless strict validation is requested.

use crate::error::EntitlementError;
use crate::rule_data::{
    CheckOperationType, CheckOperationV2, LogicalOperation as WireLogicalOperation,
    LogicalOperationType, Operation, OperationType, RuleDataV2,
};
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A leaf predicate, e.g. "holds at least N of token T on chain C".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckNode {
    pub check_type: CheckOperationType,
    pub chain_id: U256,
    pub contract_address: Address,
    pub params: Bytes,
}

/// An AND/OR combinator over two subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalNode {
    pub logical_type: LogicalOperationType,
    pub left: Box<OperationNode>,
    pub right: Box<OperationNode>,
}

/// A decoded, evaluable operation tree. Each node exclusively owns its
/// subtrees; the tree is acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationNode {
    Check(CheckNode),
    Logical(LogicalNode),
}

/// Decodes rule data into a single operation tree.
///
/// Declared operand indices on logical operations are ignored; operands are
/// resolved positionally from the post-order sequence.
pub fn operation_tree(rule_data: &RuleDataV2) -> Result<OperationNode, EntitlementError> {
    build_tree(rule_data, false)
}

/// Like [`operation_tree`], but additionally requires every logical
/// operation's declared operand indices to match the post-order positions of
/// the operands it actually consumes.
pub fn operation_tree_strict(rule_data: &RuleDataV2) -> Result<OperationNode, EntitlementError> {
    build_tree(rule_data, true)
}

fn build_tree(rule_data: &RuleDataV2, strict: bool) -> Result<OperationNode, EntitlementError> {
    debug!(
        operations = rule_data.operations.len(),
        check_operations = rule_data.checkOperations.len(),
        logical_operations = rule_data.logicalOperations.len(),
        "decoding operation tree"
    );

    // Stack entries carry the position of the subtree root within the
    // post-order sequence, for strict operand-index validation.
    let mut stack: Vec<(OperationNode, usize)> = Vec::new();

    for (position, operation) in rule_data.operations.iter().enumerate() {
        match OperationType::try_from(operation.opType)? {
            OperationType::Check => {
                let check_op = rule_data
                    .checkOperations
                    .get(operation.index as usize)
                    .ok_or(EntitlementError::CheckOperationOutOfBounds(operation.index))?;
                stack.push((OperationNode::Check(decode_check(check_op)?), position));
            }
            OperationType::Logical => {
                let logical_op = rule_data
                    .logicalOperations
                    .get(operation.index as usize)
                    .ok_or(EntitlementError::LogicalOperationOutOfBounds(
                        operation.index,
                    ))?;
                let logical_type = match LogicalOperationType::try_from(logical_op.logOpType)? {
                    LogicalOperationType::None => {
                        return Err(EntitlementError::UnknownLogicalOperationType(
                            logical_op.logOpType,
                        ))
                    }
                    combinator => combinator,
                };
                let Some((right, right_position)) = stack.pop() else {
                    return Err(EntitlementError::NotEnoughOperands);
                };
                let Some((left, left_position)) = stack.pop() else {
                    return Err(EntitlementError::NotEnoughOperands);
                };
                if strict
                    && (logical_op.leftOperationIndex as usize != left_position
                        || logical_op.rightOperationIndex as usize != right_position)
                {
                    return Err(EntitlementError::OperandIndexMismatch {
                        left: logical_op.leftOperationIndex,
                        right: logical_op.rightOperationIndex,
                        actual_left: left_position,
                        actual_right: right_position,
                    });
                }
                stack.push((
                    OperationNode::Logical(LogicalNode {
                        logical_type,
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
                    position,
                ));
            }
            OperationType::None => {
                return Err(EntitlementError::UnknownOperationType(operation.opType))
            }
        }
    }

    let Some((root, _)) = stack.pop() else {
        return Err(EntitlementError::MalformedPostOrder(0));
    };
    if !stack.is_empty() {
        return Err(EntitlementError::MalformedPostOrder(stack.len() + 1));
    }
    Ok(root)
}

fn decode_check(check_op: &CheckOperationV2) -> Result<CheckNode, EntitlementError> {
    Ok(CheckNode {
        check_type: CheckOperationType::try_from(check_op.opType)?,
        chain_id: check_op.chainId,
        contract_address: check_op.contractAddress,
        params: check_op.params.clone(),
    })
}

impl OperationNode {
    /// Emits the flat post-order rule data encoding of this tree, the
    /// inverse of [`operation_tree`].
    ///
    /// Logical operand indices are written as the post-order positions of
    /// the operand subtree roots, so the result also survives
    /// [`operation_tree_strict`].
    pub fn to_rule_data(&self) -> RuleDataV2 {
        let mut rule_data = RuleDataV2::empty();
        self.write_post_order(&mut rule_data);
        rule_data
    }

    // Returns the position of this subtree's root in the operations array.
    fn write_post_order(&self, rule_data: &mut RuleDataV2) -> usize {
        match self {
            OperationNode::Check(check) => {
                rule_data.checkOperations.push(CheckOperationV2 {
                    opType: check.check_type as u8,
                    chainId: check.chain_id,
                    contractAddress: check.contract_address,
                    params: check.params.clone(),
                });
                rule_data.operations.push(Operation {
                    opType: OperationType::Check as u8,
                    index: (rule_data.checkOperations.len() - 1) as u8,
                });
            }
            OperationNode::Logical(logical) => {
                let left_position = logical.left.write_post_order(rule_data);
                let right_position = logical.right.write_post_order(rule_data);
                rule_data.logicalOperations.push(WireLogicalOperation {
                    logOpType: logical.logical_type as u8,
                    leftOperationIndex: left_position as u8,
                    rightOperationIndex: right_position as u8,
                });
                rule_data.operations.push(Operation {
                    opType: OperationType::Logical as u8,
                    index: (rule_data.logicalOperations.len() - 1) as u8,
                });
            }
        }
        rule_data.operations.len() - 1
    }
}
