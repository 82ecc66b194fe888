//! Apportioning a fixed target supply between named members and the issuer.
//!
//! The planner is pure: it never touches storage. Given the target and the
//! member amounts it yields the residual the issuer must receive so that the
//! sum of all mints lands exactly on the target.

use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

use crate::{Config, Error};

/// Why a plan cannot be turned into mints.
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, RuntimeDebug)]
pub enum AllocationError {
    /// Member amounts (or amounts already minted) exceed the target total.
    ExceedsTarget,
    /// Scaling or summing amounts overflowed `u128`.
    Arithmetic,
}

impl<T: Config> From<AllocationError> for Error<T> {
    fn from(e: AllocationError) -> Self {
        match e {
            AllocationError::ExceedsTarget => Error::<T>::AllocationOverflow,
            AllocationError::Arithmetic => Error::<T>::Overflow,
        }
    }
}

/// Unit in which a plan's amounts are written.
#[derive(Clone, Copy, PartialEq, Eq, Default, Encode, Decode, TypeInfo, RuntimeDebug)]
pub enum Denomination {
    /// Amounts are raw ledger units and are minted as-is.
    #[default]
    BaseUnits,
    /// Amounts are whole tokens, scaled by `10^decimals` before minting.
    WholeTokens { decimals: u8 },
}

impl Denomination {
    /// Multiplier from plan units to ledger units.
    pub fn scale(self) -> Result<u128, AllocationError> {
        match self {
            Denomination::BaseUnits => Ok(1),
            Denomination::WholeTokens { decimals } => {
                10u128.checked_pow(u32::from(decimals)).ok_or(AllocationError::Arithmetic)
            }
        }
    }
}

/// One named member's share.
#[derive(Clone, PartialEq, Eq, Encode, Decode, TypeInfo, RuntimeDebug)]
pub struct Allocation<AccountId> {
    pub account: AccountId,
    pub amount: u128,
}

/// Ordered member allocations plus the total the issuance must reach.
///
/// Accounts may repeat; each entry is minted separately and in order.
#[derive(Clone, PartialEq, Eq, Encode, Decode, TypeInfo, RuntimeDebug)]
pub struct AllocationPlan<AccountId> {
    target_total: u128,
    members: Vec<Allocation<AccountId>>,
    denomination: Denomination,
}

impl<AccountId> AllocationPlan<AccountId> {
    pub fn new(target_total: u128, members: impl IntoIterator<Item = (AccountId, u128)>) -> Self {
        Self {
            target_total,
            members: members
                .into_iter()
                .map(|(account, amount)| Allocation { account, amount })
                .collect(),
            denomination: Denomination::BaseUnits,
        }
    }

    pub fn with_denomination(mut self, denomination: Denomination) -> Self {
        self.denomination = denomination;
        self
    }

    /// Target as written in the plan, before scaling.
    pub fn target_total(&self) -> u128 {
        self.target_total
    }

    pub fn denomination(&self) -> Denomination {
        self.denomination
    }

    pub fn members(&self) -> &[Allocation<AccountId>] {
        &self.members
    }

    /// Converts a plan amount into ledger units.
    pub fn to_base_units(&self, amount: u128) -> Result<u128, AllocationError> {
        amount.checked_mul(self.denomination.scale()?).ok_or(AllocationError::Arithmetic)
    }

    pub fn target_in_base_units(&self) -> Result<u128, AllocationError> {
        self.to_base_units(self.target_total)
    }

    /// Sum of all member amounts, in ledger units.
    ///
    /// A sum past `u128::MAX` is past any target too, so it reports
    /// [`AllocationError::ExceedsTarget`].
    pub fn declared_total(&self) -> Result<u128, AllocationError> {
        let scale = self.denomination.scale()?;
        self.members.iter().try_fold(0u128, |acc, member| {
            member
                .amount
                .checked_mul(scale)
                .and_then(|amount| acc.checked_add(amount))
                .ok_or(AllocationError::ExceedsTarget)
        })
    }

    /// Residual owed to the issuer if every member mint lands.
    pub fn residual(&self) -> Result<u128, AllocationError> {
        residual(self.target_in_base_units()?, self.declared_total()?)
    }

    /// Residual owed to the issuer given what has actually been minted to members.
    pub fn residual_after(&self, minted: u128) -> Result<u128, AllocationError> {
        residual(self.target_in_base_units()?, minted)
    }
}

/// `target_total - minted`, or [`AllocationError::ExceedsTarget`] when negative.
pub fn residual(target_total: u128, minted: u128) -> Result<u128, AllocationError> {
    target_total.checked_sub(minted).ok_or(AllocationError::ExceedsTarget)
}
