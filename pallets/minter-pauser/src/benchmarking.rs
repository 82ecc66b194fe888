//! Benchmarking setup for pallet-minter-pauser

use super::*;

#[allow(unused)]
use crate::Pallet as Token;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

/// Initializes the token with the whitelisted caller holding every role.
fn seated_issuer<T: Config>() -> T::AccountId {
    let issuer: T::AccountId = whitelisted_caller();
    Pallet::<T>::do_initialize(&issuer, b"Bench".to_vec(), b"BNC".to_vec(), DEFAULT_DECIMALS)
        .expect("fresh token initializes");
    issuer
}

fn funded<T: Config>(issuer: &T::AccountId, seed: u32, amount: u128) -> T::AccountId {
    let holder: T::AccountId = account("holder", seed, 0);
    Pallet::<T>::do_mint(issuer, &holder, amount).expect("issuer can mint");
    holder
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn initialize() {
        let caller: T::AccountId = whitelisted_caller();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), sp_std::vec![b'n'; 64], sp_std::vec![b's'; 16]);

        assert!(Initialized::<T>::get());
        assert!(Pallet::<T>::has_role(Role::Pauser, &caller));
    }

    #[benchmark]
    fn mint() {
        let issuer = seated_issuer::<T>();
        let recipient: T::AccountId = account("recipient", 0, 0);
        let amount: u128 = 1_000_000;

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer), recipient.clone(), amount);

        assert_eq!(Balances::<T>::get(&recipient), amount);
    }

    #[benchmark]
    fn burn() {
        let issuer = seated_issuer::<T>();
        let holder = funded::<T>(&issuer, 0, 10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(holder.clone()), 1_000_000);

        assert_eq!(Balances::<T>::get(&holder), 9_000_000);
    }

    #[benchmark]
    fn burn_from() {
        let issuer = seated_issuer::<T>();
        let holder = funded::<T>(&issuer, 0, 10_000_000);
        let spender: T::AccountId = account("spender", 0, 0);
        Allowances::<T>::insert(&holder, &spender, 5_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender.clone()), holder.clone(), 1_000_000);

        assert_eq!(Allowances::<T>::get(&holder, &spender), 4_000_000);
    }

    #[benchmark]
    fn transfer() {
        let issuer = seated_issuer::<T>();
        let holder = funded::<T>(&issuer, 0, 10_000_000);
        let recipient: T::AccountId = account("recipient", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(holder), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000_000);
    }

    #[benchmark]
    fn approve() {
        let owner: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner.clone()), spender.clone(), 1_000_000);

        assert_eq!(Allowances::<T>::get(&owner, &spender), 1_000_000);
    }

    #[benchmark]
    fn transfer_from() {
        let issuer = seated_issuer::<T>();
        let holder = funded::<T>(&issuer, 0, 10_000_000);
        let spender: T::AccountId = account("spender", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        Allowances::<T>::insert(&holder, &spender, 5_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender), holder, recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000_000);
    }

    #[benchmark]
    fn pause() {
        let issuer = seated_issuer::<T>();

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer));

        assert!(Paused::<T>::get());
    }

    #[benchmark]
    fn unpause() {
        let issuer = seated_issuer::<T>();
        Paused::<T>::put(true);

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer));

        assert!(!Paused::<T>::get());
    }

    #[benchmark]
    fn grant_role() {
        let issuer = seated_issuer::<T>();
        let grantee: T::AccountId = account("grantee", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer), Role::Minter, grantee.clone());

        assert!(Pallet::<T>::has_role(Role::Minter, &grantee));
    }

    #[benchmark]
    fn revoke_role() {
        let issuer = seated_issuer::<T>();
        let grantee: T::AccountId = account("grantee", 0, 0);
        Pallet::<T>::insert_role_member(Role::Minter, &grantee).expect("role has room");

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer), Role::Minter, grantee.clone());

        assert!(!Pallet::<T>::has_role(Role::Minter, &grantee));
    }

    #[benchmark]
    fn renounce_role() {
        let issuer = seated_issuer::<T>();

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer.clone()), Role::Pauser);

        assert!(!Pallet::<T>::has_role(Role::Pauser, &issuer));
    }

    #[benchmark]
    fn issue(a: Linear<0, { T::MaxAllocations::get() }>) {
        let issuer = seated_issuer::<T>();
        let allocations: Vec<(T::AccountId, u128)> =
            (0..a).map(|i| (account("member", i, 0), 1_000)).collect();
        let allocations: BoundedVec<_, T::MaxAllocations> =
            allocations.try_into().expect("within MaxAllocations");
        let target_total = 1_000 * u128::from(a) + 1_000_000;

        #[extrinsic_call]
        _(RawOrigin::Signed(issuer.clone()), target_total, allocations);

        assert_eq!(TotalSupply::<T>::get(), target_total);
        assert_eq!(Balances::<T>::get(&issuer), 1_000_000);
    }

    impl_benchmark_test_suite!(Token, crate::mock::uninitialized_ext(), crate::mock::Test);
}
