//! Centralized Contract Definitions
//!
//! All Solidity interfaces the console talks to, defined using alloy's
//! `sol!` macro. Each interface is annotated with `#[sol(rpc)]` to generate
//! contract instance types that can make RPC calls via any alloy Provider.
//!
//! The `PoolKey` struct is shared between the swap router interface and the
//! pool-identity derivation: its field order and widths fix the ABI layout
//! that the ledger hashes into a pool id.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use alloy::sol;

sol! {
    /// Uniswap-v4-style pool key. ABI-encodes to five 32-byte words
    /// (address, address, uint24, int24, address); keccak256 of that
    /// encoding is the canonical pool id.
    #[derive(Debug, PartialEq)]
    struct PoolKey {
        address currency0;
        address currency1;
        uint24 fee;
        int24 tickSpacing;
        address hooks;
    }

    // ── PolicyRegistry (per-trader custom limits + name aliases) ─────────

    #[sol(rpc)]
    interface IPolicyRegistry {
        function setPolicy(address trader, uint256 maxSwapAbs, uint256 cooldownSeconds) external;
        function setPolicyForENS(string calldata name, uint256 maxSwapAbs, uint256 cooldownSeconds) external;
        function clearPolicy(address trader) external;
        function resolveENS(string calldata name) external view returns (address trader);
        function getPolicy(address trader) external view returns (uint256 maxSwapAbs, uint256 cooldownSeconds, bool exists);

        event PolicySet(address indexed trader, uint256 maxSwapAbs, uint256 cooldownSeconds);
        event PolicyCleared(address indexed trader);
    }

    // ── UniswapExeGuard hook (defaults + cooldown enforcement) ───────────

    #[sol(rpc)]
    interface IUniswapExeGuard {
        function setDefaults(uint256 defaultMaxSwapAbs, uint256 defaultCooldownSeconds) external;
        function defaultMaxSwapAbs() external view returns (uint256);
        function defaultCooldownSeconds() external view returns (uint256);
        function lastSwapTimestampByPool(address trader, bytes32 poolId) external view returns (uint256);

        event DefaultsUpdated(uint256 defaultMaxSwapAbs, uint256 defaultCooldownSeconds);
        event SwapAllowed(address indexed trader, int256 amountSpecified, uint256 maxSwapAbs, uint256 cooldownSeconds);
        event SwapBlocked(address indexed trader, uint8 reason, int256 amountSpecified);
    }

    // ── PoolSwapTest router (demo swap submission) ───────────────────────

    #[sol(rpc)]
    interface IPoolSwapTest {
        struct SwapParams {
            bool zeroForOne;
            int256 amountSpecified;
            uint160 sqrtPriceLimitX96;
        }

        struct TestSettings {
            bool takeClaims;
            bool settleUsingBurn;
        }

        function swap(PoolKey calldata key, SwapParams calldata params, TestSettings calldata testSettings, bytes calldata hookData) external payable returns (int256 delta);
    }

    // ── ERC20 ────────────────────────────────────────────────────────────

    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}
