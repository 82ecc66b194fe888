//! Weights for pallet-minter-pauser.
//!
//! Hand-estimated from the storage accesses of each call. Regenerate with
//! `frame-omni-bencher` against the `runtime-benchmarks` feature before mainnet.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

/// Weight functions needed for pallet-minter-pauser.
pub trait WeightInfo {
    fn initialize() -> Weight;
    fn mint() -> Weight;
    fn burn() -> Weight;
    fn burn_from() -> Weight;
    fn transfer() -> Weight;
    fn approve() -> Weight;
    fn transfer_from() -> Weight;
    fn pause() -> Weight;
    fn unpause() -> Weight;
    fn grant_role() -> Weight;
    fn revoke_role() -> Weight;
    fn renounce_role() -> Weight;
    fn issue(a: u32) -> Weight;
}

/// Weights for pallet-minter-pauser using the runtime's configured database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Storage: `Initialized` (r:1 w:1), `RoleMembers` (r:3 w:3), metadata (r:0 w:3)
    fn initialize() -> Weight {
        Weight::from_parts(25_000_000, 3_000).saturating_add(T::DbWeight::get().reads_writes(4, 7))
    }
    /// Storage: `RoleMembers` (r:1), `Paused` (r:1), `TotalSupply` (r:1 w:1), `Balances` (r:1 w:1)
    fn mint() -> Weight {
        Weight::from_parts(18_000_000, 3_500).saturating_add(T::DbWeight::get().reads_writes(4, 2))
    }
    /// Storage: `Paused` (r:1), `TotalSupply` (r:1 w:1), `Balances` (r:1 w:1)
    fn burn() -> Weight {
        Weight::from_parts(15_000_000, 3_500).saturating_add(T::DbWeight::get().reads_writes(3, 2))
    }
    /// Storage: `Paused` (r:1), `Allowances` (r:1 w:1), `TotalSupply` (r:1 w:1), `Balances` (r:1 w:1)
    fn burn_from() -> Weight {
        Weight::from_parts(20_000_000, 3_500).saturating_add(T::DbWeight::get().reads_writes(4, 3))
    }
    /// Storage: `Paused` (r:1), `Balances` (r:2 w:2)
    fn transfer() -> Weight {
        Weight::from_parts(17_000_000, 6_000).saturating_add(T::DbWeight::get().reads_writes(3, 2))
    }
    /// Storage: `Allowances` (r:0 w:1)
    fn approve() -> Weight {
        Weight::from_parts(10_000_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }
    /// Storage: `Paused` (r:1), `Allowances` (r:1 w:1), `Balances` (r:2 w:2)
    fn transfer_from() -> Weight {
        Weight::from_parts(22_000_000, 6_000).saturating_add(T::DbWeight::get().reads_writes(4, 3))
    }
    /// Storage: `RoleMembers` (r:1), `Paused` (r:1 w:1)
    fn pause() -> Weight {
        Weight::from_parts(12_000_000, 1_500).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    /// Storage: `RoleMembers` (r:1), `Paused` (r:1 w:1)
    fn unpause() -> Weight {
        Weight::from_parts(12_000_000, 1_500).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    /// Storage: `RoleMembers` (r:2 w:1)
    fn grant_role() -> Weight {
        Weight::from_parts(14_000_000, 3_000).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    /// Storage: `RoleMembers` (r:2 w:1)
    fn revoke_role() -> Weight {
        Weight::from_parts(14_000_000, 3_000).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    /// Storage: `RoleMembers` (r:1 w:1)
    fn renounce_role() -> Weight {
        Weight::from_parts(12_000_000, 1_500).saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    /// Storage: per member as `mint`, plus one residual mint.
    /// The range of component `a` is `[0, MaxAllocations]`.
    fn issue(a: u32) -> Weight {
        Weight::from_parts(20_000_000, 3_500)
            .saturating_add(Weight::from_parts(18_000_000, 2_500).saturating_mul(a.into()))
            .saturating_add(T::DbWeight::get().reads_writes(4, 2))
            .saturating_add(T::DbWeight::get().reads_writes(4, 2).saturating_mul(a.into()))
    }
}

// For backwards compatibility and tests.
impl WeightInfo for () {
    fn initialize() -> Weight {
        Weight::from_parts(25_000_000, 3_000).saturating_add(RocksDbWeight::get().reads_writes(4, 7))
    }
    fn mint() -> Weight {
        Weight::from_parts(18_000_000, 3_500).saturating_add(RocksDbWeight::get().reads_writes(4, 2))
    }
    fn burn() -> Weight {
        Weight::from_parts(15_000_000, 3_500).saturating_add(RocksDbWeight::get().reads_writes(3, 2))
    }
    fn burn_from() -> Weight {
        Weight::from_parts(20_000_000, 3_500).saturating_add(RocksDbWeight::get().reads_writes(4, 3))
    }
    fn transfer() -> Weight {
        Weight::from_parts(17_000_000, 6_000).saturating_add(RocksDbWeight::get().reads_writes(3, 2))
    }
    fn approve() -> Weight {
        Weight::from_parts(10_000_000, 0).saturating_add(RocksDbWeight::get().writes(1))
    }
    fn transfer_from() -> Weight {
        Weight::from_parts(22_000_000, 6_000).saturating_add(RocksDbWeight::get().reads_writes(4, 3))
    }
    fn pause() -> Weight {
        Weight::from_parts(12_000_000, 1_500).saturating_add(RocksDbWeight::get().reads_writes(2, 1))
    }
    fn unpause() -> Weight {
        Weight::from_parts(12_000_000, 1_500).saturating_add(RocksDbWeight::get().reads_writes(2, 1))
    }
    fn grant_role() -> Weight {
        Weight::from_parts(14_000_000, 3_000).saturating_add(RocksDbWeight::get().reads_writes(2, 1))
    }
    fn revoke_role() -> Weight {
        Weight::from_parts(14_000_000, 3_000).saturating_add(RocksDbWeight::get().reads_writes(2, 1))
    }
    fn renounce_role() -> Weight {
        Weight::from_parts(12_000_000, 1_500).saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn issue(a: u32) -> Weight {
        Weight::from_parts(20_000_000, 3_500)
            .saturating_add(Weight::from_parts(18_000_000, 2_500).saturating_mul(a.into()))
            .saturating_add(RocksDbWeight::get().reads_writes(4, 2))
            .saturating_add(RocksDbWeight::get().reads_writes(4, 2).saturating_mul(a.into()))
    }
}
