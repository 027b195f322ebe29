//! Check-operation parameter codec.
//!
//! V2 rule data carries per-check parameters as an opaque byte blob: the
//! fields of a fixed-shape tuple packed as raw 32-byte big-endian words, in
//! declaration order, with no ABI head or length prefix. The blob is not a
//! standalone ABI value, so the exact length is validated before decoding.

use crate::error::EntitlementError;
use crate::rule_data::CheckOperationType;
use alloy_sol_types::{sol, SolValue};
use serde::{Deserialize, Serialize};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct ThresholdParams {
        uint256 threshold;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ERC1155Params {
        uint256 threshold;
        uint256 tokenId;
    }
}

const WORD_BYTES: usize = 32;
const THRESHOLD_PARAMS_BYTES: usize = WORD_BYTES;
const ERC1155_PARAMS_BYTES: usize = 2 * WORD_BYTES;

impl ThresholdParams {
    pub fn encode(&self) -> Vec<u8> {
        self.abi_encode_params()
    }

    pub fn decode(encoded: &[u8]) -> Result<Self, EntitlementError> {
        if encoded.len() != THRESHOLD_PARAMS_BYTES {
            return Err(EntitlementError::InvalidParamsLength {
                expected: THRESHOLD_PARAMS_BYTES,
                got: encoded.len(),
            });
        }
        Self::abi_decode_params(encoded).map_err(|_| EntitlementError::ParamsDecodingFailed)
    }
}

impl ERC1155Params {
    pub fn encode(&self) -> Vec<u8> {
        self.abi_encode_params()
    }

    pub fn decode(encoded: &[u8]) -> Result<Self, EntitlementError> {
        if encoded.len() != ERC1155_PARAMS_BYTES {
            return Err(EntitlementError::InvalidParamsLength {
                expected: ERC1155_PARAMS_BYTES,
                got: encoded.len(),
            });
        }
        Self::abi_decode_params(encoded).map_err(|_| EntitlementError::ParamsDecodingFailed)
    }
}

/// Typed view over a check operation's params blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckParams {
    /// IsEntitled and None checks carry no parameters.
    None,
    Threshold { threshold: alloy_primitives::U256 },
    Erc1155 {
        threshold: alloy_primitives::U256,
        token_id: alloy_primitives::U256,
    },
}

/// Decodes the params blob of a check operation according to its check type.
pub fn decode_check_params(
    check_type: CheckOperationType,
    params: &[u8],
) -> Result<CheckParams, EntitlementError> {
    match check_type {
        CheckOperationType::Mock
        | CheckOperationType::Erc20
        | CheckOperationType::Erc721
        | CheckOperationType::EthBalance => {
            let decoded = ThresholdParams::decode(params)?;
            Ok(CheckParams::Threshold {
                threshold: decoded.threshold,
            })
        }
        CheckOperationType::Erc1155 => {
            let decoded = ERC1155Params::decode(params)?;
            Ok(CheckParams::Erc1155 {
                threshold: decoded.threshold,
                token_id: decoded.tokenId,
            })
        }
        CheckOperationType::IsEntitled | CheckOperationType::None => Ok(CheckParams::None),
    }
}
