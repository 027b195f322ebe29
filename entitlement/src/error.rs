use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    #[error("Unknown operation type {0}")]
    UnknownOperationType(u8),
    #[error("Unknown check operation type {0}")]
    UnknownCheckOperationType(u8),
    #[error("Unknown logical operation type {0}")]
    UnknownLogicalOperationType(u8),
    #[error("Check operation index {0} out of bounds")]
    CheckOperationOutOfBounds(u8),
    #[error("Logical operation index {0} out of bounds")]
    LogicalOperationOutOfBounds(u8),
    #[error("Invalid post-order array, not enough operands")]
    NotEnoughOperands,
    #[error("Invalid post-order array, {0} operations left on the stack")]
    MalformedPostOrder(usize),
    #[error("Declared operand indices ({left}, {right}) disagree with post-order positions ({actual_left}, {actual_right})")]
    OperandIndexMismatch {
        left: u8,
        right: u8,
        actual_left: usize,
        actual_right: usize,
    },
    #[error("Invalid params buffer of {got} bytes, expected {expected}")]
    InvalidParamsLength { expected: usize, got: usize },
    #[error("Params decoding failed")]
    ParamsDecodingFailed,
    #[error("ERC1155 not supported by V1 rule data")]
    Erc1155NotSupportedInV1,
    #[error("Invalid entitlement type '{0}'")]
    InvalidEntitlementType(String),
    #[error("Entitlement data decoding failed: {0}")]
    EntitlementDataDecodingFailed(String),
}
