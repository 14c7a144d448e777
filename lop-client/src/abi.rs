//! Solidity ABI definitions of the limit order protocol, the predicate
//! helpers it exposes, and the token interface used for balance checks
#![allow(missing_docs)]
#![allow(unused_doc_comments)]
#![allow(clippy::too_many_arguments)]

use alloy::sol;
use alloy_sol_types::SolCall;

/// The length of a function selector
pub const SELECTOR_LEN: usize = 4;

sol! {
    /// The order struct signed by the maker
    #[derive(Debug, PartialEq, Eq)]
    struct Order {
        uint256 salt;
        address maker;
        address receiver;
        address makerAsset;
        address takerAsset;
        uint256 makingAmount;
        uint256 takingAmount;
        uint256 makerTraits;
    }

    interface IOrderMixin {
        function fillOrderArgs(Order calldata order, bytes32 r, bytes32 vs, uint256 amount, uint256 takerTraits, bytes calldata args) external payable returns (uint256 makingAmount, uint256 takingAmount, bytes32 orderHash);
        function hashOrder(Order calldata order) external view returns (bytes32);
    }

    interface IPredicateHelper {
        function arbitraryStaticCall(address target, bytes calldata data) external view returns (uint256);
        function gt(uint256 value, bytes calldata data) external view returns (bool);
        function lt(uint256 value, bytes calldata data) external view returns (bool);
        function eq(uint256 value, bytes calldata data) external view returns (bool);
        function and(uint256[] calldata offsets, bytes calldata data) external view returns (bool);
        function or(uint256[] calldata offsets, bytes calldata data) external view returns (bool);
    }

    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

use IOrderMixin::fillOrderArgsCall;
use IPredicateHelper::*;

/// Selector for `fillOrderArgs`
pub const FILL_ORDER_ARGS_SELECTOR: [u8; SELECTOR_LEN] = fillOrderArgsCall::SELECTOR;
/// Selector for `arbitraryStaticCall`
pub const ARBITRARY_STATIC_CALL_SELECTOR: [u8; SELECTOR_LEN] = arbitraryStaticCallCall::SELECTOR;
/// Selector for `gt`
pub const GT_SELECTOR: [u8; SELECTOR_LEN] = gtCall::SELECTOR;
/// Selector for `lt`
pub const LT_SELECTOR: [u8; SELECTOR_LEN] = ltCall::SELECTOR;
/// Selector for `eq`
pub const EQ_SELECTOR: [u8; SELECTOR_LEN] = eqCall::SELECTOR;
/// Selector for `and`
pub const AND_SELECTOR: [u8; SELECTOR_LEN] = andCall::SELECTOR;
/// Selector for `or`
pub const OR_SELECTOR: [u8; SELECTOR_LEN] = orCall::SELECTOR;
