//! Step-by-step issuance of a fixed target supply.
//!
//! [`IssuanceRun`] drives deployment tooling through the sequence
//! validate plan -> initialize -> mint each member -> mint the residual to the
//! issuer -> report. Every step commits on its own; the sequence as a whole is
//! not atomic. A run that stops part-way keeps what it minted and, when run
//! again, resumes at the first member that has not been issued.
//!
//! The ledger is the source of truth. A member whose planned share is already
//! on its balance is skipped, and the residual is the target minus the supply
//! observed above the run's baseline, never the plan's declared sum. A fresh
//! run started after a crash therefore picks up where the ledger stands
//! instead of issuing twice.
//! For the all-or-nothing variant see [`crate::Pallet::issue`].

use core::fmt::Debug;

use frame_support::{dispatch::DispatchResult, storage::with_storage_layer};
use sp_runtime::{DispatchError, RuntimeDebug};
use sp_std::{marker::PhantomData, prelude::*};

use crate::{
    allocation::{self, AllocationError, AllocationPlan},
    Config, Pallet, DEFAULT_DECIMALS, LOG_TARGET,
};

/// The token operations an issuance run needs.
pub trait TokenBackend {
    type AccountId: Clone + PartialEq + Debug;

    fn is_initialized(&self) -> bool;
    fn initialize(&mut self, issuer: &Self::AccountId, name: &[u8], symbol: &[u8]) -> DispatchResult;
    fn mint(&mut self, minter: &Self::AccountId, to: &Self::AccountId, amount: u128) -> DispatchResult;
    fn balance_of(&self, who: &Self::AccountId) -> u128;
    fn total_supply(&self) -> u128;
    fn supply_invariant_holds(&self) -> bool;
}

/// Runs each step directly against pallet storage, one storage layer per step.
pub struct PalletBackend<T>(PhantomData<T>);

impl<T> Default for PalletBackend<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Config> TokenBackend for PalletBackend<T> {
    type AccountId = T::AccountId;

    fn is_initialized(&self) -> bool {
        Pallet::<T>::is_initialized()
    }

    fn initialize(&mut self, issuer: &T::AccountId, name: &[u8], symbol: &[u8]) -> DispatchResult {
        with_storage_layer(|| {
            Pallet::<T>::do_initialize(issuer, name.to_vec(), symbol.to_vec(), DEFAULT_DECIMALS)
        })
    }

    fn mint(&mut self, minter: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        with_storage_layer(|| Pallet::<T>::do_mint(minter, to, amount))
    }

    fn balance_of(&self, who: &T::AccountId) -> u128 {
        Pallet::<T>::balance_of(who)
    }

    fn total_supply(&self) -> u128 {
        Pallet::<T>::total_supply()
    }

    fn supply_invariant_holds(&self) -> bool {
        Pallet::<T>::supply_invariant_holds()
    }
}

/// What to do when a member mint fails.
#[derive(Clone, Copy, PartialEq, Eq, Default, RuntimeDebug)]
pub enum MemberFailurePolicy {
    /// Stop; a later `run` retries the failed member.
    #[default]
    Halt,
    /// Skip the member; the issuer's residual absorbs the unissued share.
    Continue,
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub enum Step<AccountId> {
    Initialize,
    MintMember { index: usize, account: AccountId, amount: u128 },
    MintResidual { account: AccountId, amount: u128 },
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub enum Outcome {
    Done,
    /// Nothing to do: the token was already initialized, the member already
    /// holds its share, or the residual is zero.
    Skipped,
    Failed(DispatchError),
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct StepRecord<AccountId> {
    pub step: Step<AccountId>,
    pub outcome: Outcome,
}

/// Final state of a completed run. All amounts are in ledger units.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct IssuanceReport {
    pub target_total: u128,
    pub minted_to_members: u128,
    pub residual: u128,
    pub total_supply: u128,
    /// `total_supply` minus the baseline equals `target_total`.
    pub target_met: bool,
    pub invariant_holds: bool,
}

#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub enum IssuanceError {
    /// Member amounts, or supply already on the ledger, exceed the target.
    AllocationOverflow,
    Arithmetic,
    /// The residual was minted but the ledger does not show the target.
    TargetMissed { target_total: u128, issued: u128 },
    /// The step at `step` (an index into [`IssuanceRun::steps`]) failed.
    Halted { step: usize, error: DispatchError },
    /// The residual has been minted already.
    AlreadyComplete,
}

impl From<AllocationError> for IssuanceError {
    fn from(e: AllocationError) -> Self {
        match e {
            AllocationError::ExceedsTarget => IssuanceError::AllocationOverflow,
            AllocationError::Arithmetic => IssuanceError::Arithmetic,
        }
    }
}

/// Resumable state of one issuance.
#[derive(Clone, RuntimeDebug)]
pub struct IssuanceRun<AccountId> {
    issuer: AccountId,
    name: Vec<u8>,
    symbol: Vec<u8>,
    plan: AllocationPlan<AccountId>,
    policy: MemberFailurePolicy,
    initialized: bool,
    baseline: u128,
    next_member: usize,
    minted_to_members: u128,
    residual: Option<u128>,
    steps: Vec<StepRecord<AccountId>>,
}

impl<AccountId: Clone + PartialEq + Debug> IssuanceRun<AccountId> {
    pub fn new(issuer: AccountId, name: Vec<u8>, symbol: Vec<u8>, plan: AllocationPlan<AccountId>) -> Self {
        Self {
            issuer,
            name,
            symbol,
            plan,
            policy: MemberFailurePolicy::default(),
            initialized: false,
            baseline: 0,
            next_member: 0,
            minted_to_members: 0,
            residual: None,
            steps: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: MemberFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Supply that predates the issuance and is held outside the plan's members.
    /// Defaults to zero: the target is the token's whole supply.
    pub fn with_baseline(mut self, baseline: u128) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn plan(&self) -> &AllocationPlan<AccountId> {
        &self.plan
    }

    /// Every step attempted so far, in order, including failed attempts.
    pub fn steps(&self) -> &[StepRecord<AccountId>] {
        &self.steps
    }

    /// Ledger units credited to members, minted by this run or found on the ledger.
    pub fn minted_to_members(&self) -> u128 {
        self.minted_to_members
    }

    /// Index of the first member not yet attempted (or to be retried).
    pub fn next_member(&self) -> usize {
        self.next_member
    }

    pub fn is_complete(&self) -> bool {
        self.residual.is_some()
    }

    fn record(&mut self, step: Step<AccountId>, outcome: Outcome) -> usize {
        match &outcome {
            Outcome::Failed(error) => {
                log::warn!(target: LOG_TARGET, "issuance step {step:?} failed: {error:?}")
            }
            _ => log::info!(target: LOG_TARGET, "issuance step {step:?}: {outcome:?}"),
        }
        self.steps.push(StepRecord { step, outcome });
        self.steps.len() - 1
    }

    fn halt(&mut self, step: Step<AccountId>, error: DispatchError) -> IssuanceError {
        let step = self.record(step, Outcome::Failed(error));
        IssuanceError::Halted { step, error }
    }

    fn credit(&mut self, amount: u128) -> Result<(), IssuanceError> {
        self.minted_to_members =
            self.minted_to_members.checked_add(amount).ok_or(IssuanceError::Arithmetic)?;
        Ok(())
    }

    /// Balance `account` holds once plan entries `0..=index` addressed to it have landed.
    fn owed_to(&self, account: &AccountId, index: usize) -> Result<u128, IssuanceError> {
        self.plan.members().iter().take(index + 1).filter(|m| &m.account == account).try_fold(
            0u128,
            |acc, m| {
                acc.checked_add(self.plan.to_base_units(m.amount)?).ok_or(IssuanceError::Arithmetic)
            },
        )
    }

    /// Supply issued above the baseline, as the ledger reports it.
    fn issued<B>(&self, backend: &B) -> Result<u128, IssuanceError>
    where
        B: TokenBackend<AccountId = AccountId>,
    {
        backend.total_supply().checked_sub(self.baseline).ok_or(IssuanceError::Arithmetic)
    }

    /// Drives the run forward from wherever it stopped.
    pub fn run<B>(&mut self, backend: &mut B) -> Result<IssuanceReport, IssuanceError>
    where
        B: TokenBackend<AccountId = AccountId>,
    {
        if self.is_complete() {
            return Err(IssuanceError::AlreadyComplete);
        }
        // Reject plans that can never land on the target before touching the ledger.
        self.plan.residual()?;
        let target_total = self.plan.target_in_base_units()?;

        if !self.initialized {
            if backend.is_initialized() {
                self.record(Step::Initialize, Outcome::Skipped);
            } else if let Err(error) = backend.initialize(&self.issuer, &self.name, &self.symbol) {
                return Err(self.halt(Step::Initialize, error));
            } else {
                self.record(Step::Initialize, Outcome::Done);
            }
            self.initialized = true;
        }

        while let Some(member) = self.plan.members().get(self.next_member).cloned() {
            let index = self.next_member;
            let amount = self.plan.to_base_units(member.amount)?;
            let step = Step::MintMember { index, account: member.account.clone(), amount };
            let owed = self.owed_to(&member.account, index)?;

            if backend.balance_of(&member.account) >= owed {
                self.credit(amount)?;
                self.record(step, Outcome::Skipped);
            } else {
                match backend.mint(&self.issuer, &member.account, amount) {
                    Ok(()) => {
                        self.credit(amount)?;
                        self.record(step, Outcome::Done);
                    }
                    Err(error) if self.policy == MemberFailurePolicy::Halt => {
                        return Err(self.halt(step, error));
                    }
                    Err(error) => {
                        self.record(step, Outcome::Failed(error));
                    }
                }
            }
            self.next_member += 1;
        }

        let residual = allocation::residual(target_total, self.issued(backend)?)?;
        let step = Step::MintResidual { account: self.issuer.clone(), amount: residual };
        if residual == 0 {
            self.record(step, Outcome::Skipped);
        } else if let Err(error) = backend.mint(&self.issuer, &self.issuer, residual) {
            return Err(self.halt(step, error));
        } else {
            self.record(step, Outcome::Done);
        }
        self.residual = Some(residual);

        let issued = self.issued(backend)?;
        let report = IssuanceReport {
            target_total,
            minted_to_members: self.minted_to_members,
            residual,
            total_supply: backend.total_supply(),
            target_met: issued == target_total,
            invariant_holds: backend.supply_invariant_holds(),
        };
        if !report.target_met {
            log::warn!(target: LOG_TARGET, "issuance missed target: {report:?}");
            return Err(IssuanceError::TargetMissed { target_total, issued });
        }
        log::info!(target: LOG_TARGET, "issuance complete: {report:?}");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        allocation::Denomination,
        mock::{new_test_ext, uninitialized_ext, Test, Token},
        Error,
    };
    use frame_support::assert_ok;

    const ISSUER: u64 = 1;
    const MEMBER_A: u64 = 2;
    const MEMBER_B: u64 = 3;

    fn dnycv_plan() -> AllocationPlan<u64> {
        AllocationPlan::new(9001, vec![(MEMBER_A, 1337), (MEMBER_B, 42)])
    }

    fn dnycv_run() -> IssuanceRun<u64> {
        IssuanceRun::new(ISSUER, b"DYNCV minter".to_vec(), b"DYNCV".to_vec(), dnycv_plan())
    }

    /// Pauses the token right before minting to `trip_on`, once.
    struct PauseBefore {
        inner: PalletBackend<Test>,
        trip_on: u64,
        tripped: bool,
    }

    impl PauseBefore {
        fn new(trip_on: u64) -> Self {
            Self { inner: PalletBackend::default(), trip_on, tripped: false }
        }
    }

    impl TokenBackend for PauseBefore {
        type AccountId = u64;

        fn is_initialized(&self) -> bool {
            self.inner.is_initialized()
        }
        fn initialize(&mut self, issuer: &u64, name: &[u8], symbol: &[u8]) -> DispatchResult {
            self.inner.initialize(issuer, name, symbol)
        }
        fn mint(&mut self, minter: &u64, to: &u64, amount: u128) -> DispatchResult {
            if *to == self.trip_on && !self.tripped {
                self.tripped = true;
                Token::do_pause(minter)?;
            }
            self.inner.mint(minter, to, amount)
        }
        fn balance_of(&self, who: &u64) -> u128 {
            self.inner.balance_of(who)
        }
        fn total_supply(&self) -> u128 {
            self.inner.total_supply()
        }
        fn supply_invariant_holds(&self) -> bool {
            self.inner.supply_invariant_holds()
        }
    }

    /// Mints one unit short whenever the issuer mints to itself.
    struct ShortResidual(PalletBackend<Test>);

    impl TokenBackend for ShortResidual {
        type AccountId = u64;

        fn is_initialized(&self) -> bool {
            self.0.is_initialized()
        }
        fn initialize(&mut self, issuer: &u64, name: &[u8], symbol: &[u8]) -> DispatchResult {
            self.0.initialize(issuer, name, symbol)
        }
        fn mint(&mut self, minter: &u64, to: &u64, amount: u128) -> DispatchResult {
            let amount = if to == minter { amount - 1 } else { amount };
            self.0.mint(minter, to, amount)
        }
        fn balance_of(&self, who: &u64) -> u128 {
            self.0.balance_of(who)
        }
        fn total_supply(&self) -> u128 {
            self.0.total_supply()
        }
        fn supply_invariant_holds(&self) -> bool {
            self.0.supply_invariant_holds()
        }
    }

    #[test]
    fn end_to_end_issuance_lands_on_target() {
        uninitialized_ext().execute_with(|| {
            let mut run = dnycv_run();
            let report = run.run(&mut PalletBackend::<Test>::default()).unwrap();

            assert_eq!(
                report,
                IssuanceReport {
                    target_total: 9001,
                    minted_to_members: 1379,
                    residual: 7622,
                    total_supply: 9001,
                    target_met: true,
                    invariant_holds: true,
                }
            );
            assert_eq!(Token::balance_of(MEMBER_A), 1337);
            assert_eq!(Token::balance_of(MEMBER_B), 42);
            assert_eq!(Token::balance_of(ISSUER), 7622);
            assert_eq!(Token::token_symbol().to_vec(), b"DYNCV".to_vec());

            let steps: Vec<_> = run.steps().iter().map(|r| r.step.clone()).collect();
            assert_eq!(
                steps,
                vec![
                    Step::Initialize,
                    Step::MintMember { index: 0, account: MEMBER_A, amount: 1337 },
                    Step::MintMember { index: 1, account: MEMBER_B, amount: 42 },
                    Step::MintResidual { account: ISSUER, amount: 7622 },
                ]
            );
            assert!(run.steps().iter().all(|r| r.outcome == Outcome::Done));
            assert!(run.is_complete());
        });
    }

    #[test]
    fn overflowing_plan_mints_nothing() {
        uninitialized_ext().execute_with(|| {
            let plan = AllocationPlan::new(100, vec![(MEMBER_A, 60), (MEMBER_B, 41)]);
            let mut run = IssuanceRun::new(ISSUER, b"T".to_vec(), b"T".to_vec(), plan);

            assert_eq!(
                run.run(&mut PalletBackend::<Test>::default()),
                Err(IssuanceError::AllocationOverflow)
            );
            assert!(run.steps().is_empty());
            assert!(!Token::is_initialized());
            assert_eq!(Token::total_supply(), 0);
        });
    }

    #[test]
    fn initialization_is_skipped_when_already_done() {
        uninitialized_ext().execute_with(|| {
            assert_ok!(Token::do_initialize(&ISSUER, b"X".to_vec(), b"X".to_vec(), 18));

            let mut run = dnycv_run();
            assert_ok!(run.run(&mut PalletBackend::<Test>::default()));

            assert_eq!(run.steps()[0], StepRecord { step: Step::Initialize, outcome: Outcome::Skipped });
            // Metadata from the first initialization stands.
            assert_eq!(Token::token_name().to_vec(), b"X".to_vec());
            assert_eq!(Token::total_supply(), 9001);
        });
    }

    #[test]
    fn halted_run_resumes_without_reissuing() {
        uninitialized_ext().execute_with(|| {
            let mut backend = PauseBefore::new(MEMBER_B);
            let mut run = dnycv_run();

            let err = run.run(&mut backend).unwrap_err();
            assert_eq!(
                err,
                IssuanceError::Halted { step: 2, error: Error::<Test>::ContractPaused.into() }
            );
            // First member stands, nothing else was minted.
            assert_eq!(Token::balance_of(MEMBER_A), 1337);
            assert_eq!(Token::total_supply(), 1337);
            assert_eq!(run.next_member(), 1);
            assert_eq!(run.minted_to_members(), 1337);

            assert_ok!(Token::do_unpause(&ISSUER));
            let report = run.run(&mut backend).unwrap();

            assert_eq!(report.total_supply, 9001);
            assert_eq!(Token::balance_of(MEMBER_A), 1337);
            assert_eq!(Token::balance_of(MEMBER_B), 42);
            assert_eq!(Token::balance_of(ISSUER), 7622);
            assert_eq!(
                run.steps()[2].outcome,
                Outcome::Failed(Error::<Test>::ContractPaused.into())
            );
        });
    }

    #[test]
    fn fresh_run_after_partial_issuance_does_not_reissue() {
        uninitialized_ext().execute_with(|| {
            let mut first = dnycv_run();
            assert!(first.run(&mut PauseBefore::new(MEMBER_B)).is_err());
            assert_eq!(Token::total_supply(), 1337);
            assert_ok!(Token::do_unpause(&ISSUER));

            // The first run's state is lost; a new run starts from the ledger.
            let mut retry = dnycv_run();
            let report = retry.run(&mut PalletBackend::<Test>::default()).unwrap();

            assert_eq!(report.total_supply, 9001);
            assert!(report.target_met);
            assert_eq!(report.minted_to_members, 1379);
            assert_eq!(Token::balance_of(MEMBER_A), 1337);
            assert_eq!(Token::balance_of(MEMBER_B), 42);
            assert_eq!(Token::balance_of(ISSUER), 7622);
            assert_eq!(retry.steps()[1].outcome, Outcome::Skipped);
            assert_eq!(retry.steps()[2].outcome, Outcome::Done);
        });
    }

    #[test]
    fn fresh_run_after_completed_issuance_mints_nothing() {
        uninitialized_ext().execute_with(|| {
            assert_ok!(dnycv_run().run(&mut PalletBackend::<Test>::default()));

            let mut retry = dnycv_run();
            let report = retry.run(&mut PalletBackend::<Test>::default()).unwrap();

            assert_eq!(report.residual, 0);
            assert_eq!(report.total_supply, 9001);
            assert!(retry.steps().iter().all(|r| r.outcome == Outcome::Skipped));
            assert_eq!(Token::balance_of(ISSUER), 7622);
        });
    }

    #[test]
    fn repeated_member_is_owed_each_entry() {
        uninitialized_ext().execute_with(|| {
            let plan = AllocationPlan::new(100, vec![(MEMBER_A, 10), (MEMBER_A, 15)]);
            let mut run = IssuanceRun::new(ISSUER, b"T".to_vec(), b"T".to_vec(), plan);
            assert_ok!(run.run(&mut PalletBackend::<Test>::default()));

            assert_eq!(Token::balance_of(MEMBER_A), 25);
            assert_eq!(Token::balance_of(ISSUER), 75);
        });
    }

    #[test]
    fn baseline_excludes_supply_held_outside_the_plan() {
        new_test_ext().execute_with(|| {
            let baseline = Token::total_supply();
            let plan = AllocationPlan::new(9001, vec![(5, 1337), (6, 42)]);
            let mut run =
                IssuanceRun::new(ISSUER, b"T".to_vec(), b"T".to_vec(), plan).with_baseline(baseline);
            let report = run.run(&mut PalletBackend::<Test>::default()).unwrap();

            assert_eq!(report.residual, 7622);
            assert_eq!(report.total_supply, baseline + 9001);
            assert!(report.target_met);
        });
    }

    #[test]
    fn supply_already_past_target_is_refused() {
        new_test_ext().execute_with(|| {
            let supply = Token::total_supply();
            let mut run = dnycv_run();

            assert_eq!(
                run.run(&mut PalletBackend::<Test>::default()),
                Err(IssuanceError::AllocationOverflow)
            );
            assert_eq!(Token::total_supply(), supply);
            assert!(!run.is_complete());
        });
    }

    #[test]
    fn missed_target_is_an_error() {
        uninitialized_ext().execute_with(|| {
            let mut run = dnycv_run();
            assert_eq!(
                run.run(&mut ShortResidual(PalletBackend::default())),
                Err(IssuanceError::TargetMissed { target_total: 9001, issued: 9000 })
            );
            assert_eq!(Token::total_supply(), 9000);
        });
    }

    #[test]
    fn continue_policy_lets_residual_absorb_failed_member() {
        uninitialized_ext().execute_with(|| {
            let mut backend = PauseBefore::new(MEMBER_A);
            let mut run = dnycv_run().with_policy(MemberFailurePolicy::Continue);

            // Everything fails while paused: both members are skipped and the
            // run halts on the residual.
            let err = run.run(&mut backend).unwrap_err();
            assert!(matches!(err, IssuanceError::Halted { step: 3, .. }));
            assert_eq!(run.next_member(), 2);
            assert_eq!(Token::total_supply(), 0);

            assert_ok!(Token::do_unpause(&ISSUER));
            let report = run.run(&mut backend).unwrap();

            assert_eq!(report.minted_to_members, 0);
            assert_eq!(report.residual, 9001);
            assert_eq!(report.total_supply, 9001);
            assert_eq!(Token::balance_of(ISSUER), 9001);
            assert_eq!(Token::balance_of(MEMBER_A), 0);
        });
    }

    #[test]
    fn completed_run_refuses_to_mint_again() {
        uninitialized_ext().execute_with(|| {
            let mut backend = PalletBackend::<Test>::default();
            let mut run = dnycv_run();
            assert_ok!(run.run(&mut backend));

            assert_eq!(run.run(&mut backend), Err(IssuanceError::AlreadyComplete));
            assert_eq!(Token::total_supply(), 9001);
        });
    }

    #[test]
    fn whole_token_plan_is_scaled_before_minting() {
        uninitialized_ext().execute_with(|| {
            let plan = dnycv_plan().with_denomination(Denomination::WholeTokens { decimals: 2 });
            let mut run = IssuanceRun::new(ISSUER, b"T".to_vec(), b"T".to_vec(), plan);
            let report = run.run(&mut PalletBackend::<Test>::default()).unwrap();

            assert_eq!(report.target_total, 900_100);
            assert_eq!(Token::balance_of(MEMBER_A), 133_700);
            assert_eq!(Token::balance_of(MEMBER_B), 4_200);
            assert_eq!(Token::balance_of(ISSUER), 762_200);
        });
    }

    #[test]
    fn issuer_without_minter_role_halts_on_first_member() {
        uninitialized_ext().execute_with(|| {
            assert_ok!(Token::do_initialize(&9, b"T".to_vec(), b"T".to_vec(), 18));

            let mut run = dnycv_run();
            assert_eq!(
                run.run(&mut PalletBackend::<Test>::default()),
                Err(IssuanceError::Halted { step: 1, error: Error::<Test>::Unauthorized.into() })
            );
            assert_eq!(Token::total_supply(), 0);
        });
    }

    #[test]
    fn failed_initialization_halts_before_minting() {
        uninitialized_ext().execute_with(|| {
            let mut run = IssuanceRun::new(ISSUER, vec![b'n'; 65], b"T".to_vec(), dnycv_plan());
            assert_eq!(
                run.run(&mut PalletBackend::<Test>::default()),
                Err(IssuanceError::Halted { step: 0, error: Error::<Test>::NameTooLong.into() })
            );
            assert!(!Token::is_initialized());
            assert!(!Token::has_role(crate::Role::Minter, &ISSUER));
        });
    }
}
