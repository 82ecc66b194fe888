//! Named capabilities held by accounts, and an origin filter built on them.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::traits::{EnsureOrigin, Get};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;
use sp_std::marker::PhantomData;

use crate::{Config, Pallet};

/// A capability that can be granted to any number of accounts.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
pub enum Role {
    /// Grants and revokes every role, including itself.
    Admin,
    /// Creates new tokens.
    Minter,
    /// Flips the lifecycle switch.
    Pauser,
}

impl Role {
    /// Every role, in the order they are seated at initialization.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Minter, Role::Pauser];

    /// The role whose holders may grant or revoke `self`.
    pub const fn admin_role(self) -> Role {
        match self {
            Role::Admin | Role::Minter | Role::Pauser => Role::Admin,
        }
    }
}

/// Admits signed origins whose account currently holds the role returned by `R`.
///
/// Lets other pallets gate their own calls on this registry, e.g.
/// `type ForceOrigin = EnsureRole<Runtime, AdminRole>;`.
pub struct EnsureRole<T, R>(PhantomData<(T, R)>);

impl<T: Config, R: Get<Role>> EnsureOrigin<T::RuntimeOrigin> for EnsureRole<T, R> {
    type Success = T::AccountId;

    fn try_origin(o: T::RuntimeOrigin) -> Result<Self::Success, T::RuntimeOrigin> {
        let raw: Result<frame_system::RawOrigin<T::AccountId>, T::RuntimeOrigin> = o.clone().into();
        match raw {
            Ok(frame_system::RawOrigin::Signed(who)) if Pallet::<T>::has_role(R::get(), &who) => {
                Ok(who)
            }
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<T::RuntimeOrigin, ()> {
        let who: T::AccountId = frame_benchmarking::whitelisted_caller();
        Pallet::<T>::insert_role_member(R::get(), &who).map_err(|_| ())?;
        Ok(frame_system::RawOrigin::Signed(who).into())
    }
}
