#![cfg_attr(not(feature = "std"), no_std)]
// Storage getters are kept for the public query surface.
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use frame_support::{
    dispatch::DispatchResult, ensure, pallet_prelude::*, storage::with_storage_layer,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;
pub use roles::{EnsureRole, Role};
pub use weights::WeightInfo;

pub mod allocation;
pub mod issuance;
pub mod roles;
pub mod weights;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub(crate) const LOG_TARGET: &str = "pallet-minter-pauser";

/// Decimals recorded when the token is initialized through [`Pallet::initialize`].
pub const DEFAULT_DECIMALS: u8 = 18;

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use crate::allocation::AllocationPlan;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Maximum number of accounts holding any single role.
        #[pallet::constant]
        type MaxRoleMembers: Get<u32>;

        /// Maximum number of member allocations accepted by [`Pallet::issue`].
        #[pallet::constant]
        type MaxAllocations: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Token name (e.g., "DYNCV minter")
    #[pallet::storage]
    #[pallet::getter(fn token_name)]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<64>>, ValueQuery>;

    /// Token symbol (e.g., "DYNCV")
    #[pallet::storage]
    #[pallet::getter(fn token_symbol)]
    pub type TokenSymbol<T> = StorageValue<_, BoundedVec<u8, ConstU32<16>>, ValueQuery>;

    /// Token decimals, informational only; the ledger counts base units.
    #[pallet::storage]
    #[pallet::getter(fn decimals)]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    /// Set exactly once, by `initialize` or at genesis.
    #[pallet::storage]
    #[pallet::getter(fn is_initialized)]
    pub type Initialized<T> = StorageValue<_, bool, ValueQuery>;

    /// Lifecycle switch: `true` blocks every balance-mutating call.
    #[pallet::storage]
    #[pallet::getter(fn paused)]
    pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

    /// Sum of all balances.
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances. Entries survive being burnt down to zero.
    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Spending allowances, keyed by (owner, spender).
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Holders of each role, in grant order.
    #[pallet::storage]
    pub type RoleMembers<T: Config> =
        StorageMap<_, Twox64Concat, Role, BoundedVec<T::AccountId, T::MaxRoleMembers>, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Token set up; the issuer now holds every role
        Initialized { issuer: T::AccountId },
        /// Role granted to an account
        RoleGranted { role: Role, account: T::AccountId, sender: T::AccountId },
        /// Role revoked from (or renounced by) an account
        RoleRevoked { role: Role, account: T::AccountId, sender: T::AccountId },
        /// Balance-mutating calls are now blocked
        Paused { account: T::AccountId },
        /// Balance-mutating calls are allowed again
        Unpaused { account: T::AccountId },
        /// Tokens moved; `from: None` is a mint, `to: None` a burn
        Transfer { from: Option<T::AccountId>, to: Option<T::AccountId>, amount: u128 },
        /// Allowance set
        Approval { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        /// A full allocation plan was issued in one call
        Issued { issuer: T::AccountId, target_total: u128, residual: u128 },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller lacks the role the call requires.
        Unauthorized,
        /// Balance-mutating call attempted while paused.
        ContractPaused,
        AlreadyPaused,
        AlreadyActive,
        InsufficientBalance,
        InsufficientAllowance,
        /// Member allocations exceed the target total.
        AllocationOverflow,
        AlreadyInitialized,
        /// Role already has `MaxRoleMembers` holders.
        TooManyRoleMembers,
        NameTooLong,
        SymbolTooLong,
        Overflow,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::MaxRoleMembers::get() >= 1, "MaxRoleMembers must seat the issuer");
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// One-time setup: records metadata and seats the caller as ADMIN, MINTER and PAUSER.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::initialize())]
        pub fn initialize(origin: OriginFor<T>, name: Vec<u8>, symbol: Vec<u8>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_initialize(&who, name, symbol, DEFAULT_DECIMALS)
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_mint(&who, &to, amount)
        }

        /// Destroys `amount` of the caller's own tokens.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::burn())]
        pub fn burn(origin: OriginFor<T>, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_burn(&who, amount)
        }

        /// Destroys `amount` of `owner`'s tokens, spending the caller's allowance.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::burn_from())]
        pub fn burn_from(origin: OriginFor<T>, owner: T::AccountId, amount: u128) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::do_burn_from(&spender, &owner, amount)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_transfer(&sender, &to, amount)
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(origin: OriginFor<T>, spender: T::AccountId, amount: u128) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Self::do_approve(&owner, &spender, amount)
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::transfer_from())]
        pub fn transfer_from(
            origin: OriginFor<T>,
            owner: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::do_transfer_from(&spender, &owner, &to, amount)
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::pause())]
        pub fn pause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_pause(&who)
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::unpause())]
        pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_unpause(&who)
        }

        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::grant_role())]
        pub fn grant_role(origin: OriginFor<T>, role: Role, account: T::AccountId) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_grant_role(&sender, role, &account)
        }

        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::revoke_role())]
        pub fn revoke_role(
            origin: OriginFor<T>,
            role: Role,
            account: T::AccountId,
        ) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_revoke_role(&sender, role, &account)
        }

        /// Drops a role the caller holds. Needs no admin rights.
        #[pallet::call_index(11)]
        #[pallet::weight(T::WeightInfo::renounce_role())]
        pub fn renounce_role(origin: OriginFor<T>, role: Role) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::remove_role_member(role, &who, &who)
        }

        /// Mints every allocation in order and the residual to the caller, all or nothing.
        #[pallet::call_index(12)]
        #[pallet::weight(T::WeightInfo::issue(allocations.len() as u32))]
        pub fn issue(
            origin: OriginFor<T>,
            target_total: u128,
            allocations: BoundedVec<(T::AccountId, u128), T::MaxAllocations>,
        ) -> DispatchResult {
            let issuer = ensure_signed(origin)?;
            Self::do_issue(&issuer, AllocationPlan::new(target_total, allocations.into_inner()))
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// When set, the token is initialized at genesis with this account in every role
        pub issuer: Option<T::AccountId>,
        /// Token name
        pub token_name: Vec<u8>,
        /// Token symbol
        pub token_symbol: Vec<u8>,
        /// Token decimals
        pub decimals: u8,
        /// Initial token mints (account, amount)
        pub initial_balances: Vec<(T::AccountId, u128)>,
        /// Start with the lifecycle switch off
        pub paused: bool,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            if let Some(ref issuer) = self.issuer {
                Pallet::<T>::do_initialize(
                    issuer,
                    self.token_name.clone(),
                    self.token_symbol.clone(),
                    self.decimals,
                )
                .expect("Genesis issuer could not be initialized");
            } else {
                let name: BoundedVec<u8, ConstU32<64>> = self
                    .token_name
                    .clone()
                    .try_into()
                    .expect("Token name too long (max 64 bytes)");
                TokenName::<T>::put(name);

                let symbol: BoundedVec<u8, ConstU32<16>> = self
                    .token_symbol
                    .clone()
                    .try_into()
                    .expect("Token symbol too long (max 16 bytes)");
                TokenSymbol::<T>::put(symbol);

                Decimals::<T>::put(self.decimals);
            }

            let mut total: u128 = 0;
            for (account, amount) in &self.initial_balances {
                Balances::<T>::mutate(account, |balance| {
                    *balance = balance.checked_add(*amount).expect("Genesis balance overflow")
                });
                total = total.checked_add(*amount).expect("Genesis total supply overflow");
            }
            TotalSupply::<T>::put(total);

            Paused::<T>::put(self.paused);
        }
    }
}

// Role registry
impl<T: Config> Pallet<T> {
    pub fn has_role(role: Role, who: &T::AccountId) -> bool {
        RoleMembers::<T>::get(role).contains(who)
    }

    pub fn role_admin(role: Role) -> Role {
        role.admin_role()
    }

    pub fn role_member_count(role: Role) -> u32 {
        RoleMembers::<T>::decode_len(role).unwrap_or(0) as u32
    }

    /// Holder at `index` in grant order. Indices shift down after a revoke.
    pub fn role_member(role: Role, index: u32) -> Option<T::AccountId> {
        RoleMembers::<T>::get(role).get(index as usize).cloned()
    }

    pub fn role_members(role: Role) -> Vec<T::AccountId> {
        RoleMembers::<T>::get(role).into_inner()
    }

    fn ensure_role(role: Role, who: &T::AccountId) -> DispatchResult {
        ensure!(Self::has_role(role, who), Error::<T>::Unauthorized);
        Ok(())
    }

    /// Adds `who` to `role` without an admin check. No-op if already a holder.
    pub(crate) fn insert_role_member(role: Role, who: &T::AccountId) -> Result<bool, DispatchError> {
        let mut members = RoleMembers::<T>::get(role);
        if members.contains(who) {
            return Ok(false);
        }
        members.try_push(who.clone()).map_err(|_| Error::<T>::TooManyRoleMembers)?;
        RoleMembers::<T>::insert(role, members);
        Ok(true)
    }

    pub fn do_grant_role(sender: &T::AccountId, role: Role, account: &T::AccountId) -> DispatchResult {
        Self::ensure_role(role.admin_role(), sender)?;
        if Self::insert_role_member(role, account)? {
            log::debug!(target: LOG_TARGET, "{role:?} granted to {account:?} by {sender:?}");
            Self::deposit_event(Event::RoleGranted {
                role,
                account: account.clone(),
                sender: sender.clone(),
            });
        }
        Ok(())
    }

    pub fn do_revoke_role(sender: &T::AccountId, role: Role, account: &T::AccountId) -> DispatchResult {
        Self::ensure_role(role.admin_role(), sender)?;
        Self::remove_role_member(role, account, sender)
    }

    fn remove_role_member(role: Role, account: &T::AccountId, sender: &T::AccountId) -> DispatchResult {
        let mut members = RoleMembers::<T>::get(role);
        let Some(index) = members.iter().position(|member| member == account) else {
            return Ok(());
        };
        members.remove(index);
        RoleMembers::<T>::insert(role, members);

        log::debug!(target: LOG_TARGET, "{role:?} revoked from {account:?} by {sender:?}");
        Self::deposit_event(Event::RoleRevoked {
            role,
            account: account.clone(),
            sender: sender.clone(),
        });
        Ok(())
    }

    pub fn do_initialize(
        issuer: &T::AccountId,
        name: Vec<u8>,
        symbol: Vec<u8>,
        decimals: u8,
    ) -> DispatchResult {
        ensure!(!Initialized::<T>::get(), Error::<T>::AlreadyInitialized);
        let name: BoundedVec<u8, ConstU32<64>> =
            name.try_into().map_err(|_| Error::<T>::NameTooLong)?;
        let symbol: BoundedVec<u8, ConstU32<16>> =
            symbol.try_into().map_err(|_| Error::<T>::SymbolTooLong)?;

        // Build every role set first so a full set leaves no partial grant behind.
        let mut seated = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            let mut members = RoleMembers::<T>::get(role);
            if !members.contains(issuer) {
                members.try_push(issuer.clone()).map_err(|_| Error::<T>::TooManyRoleMembers)?;
            }
            seated.push((role, members));
        }

        TokenName::<T>::put(name);
        TokenSymbol::<T>::put(symbol);
        Decimals::<T>::put(decimals);
        for (role, members) in seated {
            RoleMembers::<T>::insert(role, members);
            Self::deposit_event(Event::RoleGranted {
                role,
                account: issuer.clone(),
                sender: issuer.clone(),
            });
        }
        Initialized::<T>::put(true);

        log::info!(target: LOG_TARGET, "token initialized, issuer {issuer:?}");
        Self::deposit_event(Event::Initialized { issuer: issuer.clone() });
        Ok(())
    }
}

// Lifecycle switch
impl<T: Config> Pallet<T> {
    fn ensure_active() -> DispatchResult {
        ensure!(!Paused::<T>::get(), Error::<T>::ContractPaused);
        Ok(())
    }

    pub fn do_pause(who: &T::AccountId) -> DispatchResult {
        Self::ensure_role(Role::Pauser, who)?;
        ensure!(!Paused::<T>::get(), Error::<T>::AlreadyPaused);
        Paused::<T>::put(true);
        log::info!(target: LOG_TARGET, "paused by {who:?}");
        Self::deposit_event(Event::Paused { account: who.clone() });
        Ok(())
    }

    pub fn do_unpause(who: &T::AccountId) -> DispatchResult {
        Self::ensure_role(Role::Pauser, who)?;
        ensure!(Paused::<T>::get(), Error::<T>::AlreadyActive);
        Paused::<T>::put(false);
        log::info!(target: LOG_TARGET, "unpaused by {who:?}");
        Self::deposit_event(Event::Unpaused { account: who.clone() });
        Ok(())
    }
}

// Ledger
impl<T: Config> Pallet<T> {
    pub fn do_mint(minter: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_role(Role::Minter, minter)?;
        Self::ensure_active()?;
        let supply = TotalSupply::<T>::get().checked_add(amount).ok_or(Error::<T>::Overflow)?;
        let balance = Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;

        TotalSupply::<T>::put(supply);
        Balances::<T>::insert(to, balance);

        log::debug!(target: LOG_TARGET, "minted {amount} to {to:?}, supply {supply}");
        Self::deposit_event(Event::Transfer { from: None, to: Some(to.clone()), amount });
        Ok(())
    }

    pub fn do_burn(owner: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_active()?;
        let balance = Balances::<T>::get(owner)
            .checked_sub(amount)
            .ok_or(Error::<T>::InsufficientBalance)?;
        // Supply covers every balance while the ledger is consistent.
        let supply = TotalSupply::<T>::get().checked_sub(amount).ok_or(Error::<T>::Overflow)?;

        Balances::<T>::insert(owner, balance);
        TotalSupply::<T>::put(supply);

        log::debug!(target: LOG_TARGET, "burnt {amount} from {owner:?}, supply {supply}");
        Self::deposit_event(Event::Transfer { from: Some(owner.clone()), to: None, amount });
        Ok(())
    }

    pub fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_active()?;
        let from_balance = Balances::<T>::get(from)
            .checked_sub(amount)
            .ok_or(Error::<T>::InsufficientBalance)?;

        if from != to {
            let to_balance =
                Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Balances::<T>::insert(from, from_balance);
            Balances::<T>::insert(to, to_balance);
        }

        Self::deposit_event(Event::Transfer {
            from: Some(from.clone()),
            to: Some(to.clone()),
            amount,
        });
        Ok(())
    }

    pub fn do_approve(owner: &T::AccountId, spender: &T::AccountId, amount: u128) -> DispatchResult {
        Allowances::<T>::insert(owner, spender, amount);
        Self::deposit_event(Event::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
        Ok(())
    }

    /// Allowance left after spending `amount`. An allowance of `u128::MAX` is never drawn down.
    fn allowance_after(
        owner: &T::AccountId,
        spender: &T::AccountId,
        amount: u128,
    ) -> Result<u128, DispatchError> {
        let current = Allowances::<T>::get(owner, spender);
        if current == u128::MAX {
            return Ok(current);
        }
        current.checked_sub(amount).ok_or_else(|| Error::<T>::InsufficientAllowance.into())
    }

    pub fn do_transfer_from(
        spender: &T::AccountId,
        owner: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_active()?;
        let remaining = Self::allowance_after(owner, spender, amount)?;
        Self::do_transfer(owner, to, amount)?;
        Allowances::<T>::insert(owner, spender, remaining);
        Ok(())
    }

    pub fn do_burn_from(spender: &T::AccountId, owner: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_active()?;
        let remaining = Self::allowance_after(owner, spender, amount)?;
        Self::do_burn(owner, amount)?;
        Allowances::<T>::insert(owner, spender, remaining);
        Ok(())
    }

    /// Issues a whole plan atomically: member mints in order, then the residual to `issuer`.
    pub fn do_issue(
        issuer: &T::AccountId,
        plan: allocation::AllocationPlan<T::AccountId>,
    ) -> DispatchResult {
        Self::ensure_role(Role::Minter, issuer)?;
        Self::ensure_active()?;
        let residual = plan.residual().map_err(Error::<T>::from)?;
        let target_total = plan.target_in_base_units().map_err(Error::<T>::from)?;

        with_storage_layer(|| -> DispatchResult {
            for member in plan.members() {
                let amount = plan.to_base_units(member.amount).map_err(Error::<T>::from)?;
                Self::do_mint(issuer, &member.account, amount)?;
            }
            Self::do_mint(issuer, issuer, residual)
        })?;

        log::info!(
            target: LOG_TARGET,
            "issued {target_total} across {} members, residual {residual} to {issuer:?}",
            plan.members().len()
        );
        Self::deposit_event(Event::Issued { issuer: issuer.clone(), target_total, residual });
        Ok(())
    }

    /// Whether `TotalSupply` equals the sum of every stored balance.
    pub fn supply_invariant_holds() -> bool {
        Balances::<T>::iter_values().try_fold(0u128, |acc, balance| acc.checked_add(balance))
            == Some(TotalSupply::<T>::get())
    }

    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
        ensure!(Self::supply_invariant_holds(), "total supply differs from the sum of balances");
        for (_, members) in RoleMembers::<T>::iter() {
            for (index, member) in members.iter().enumerate() {
                ensure!(
                    !members.iter().take(index).any(|earlier| earlier == member),
                    "account listed twice in a role"
                );
            }
        }
        Ok(())
    }
}
