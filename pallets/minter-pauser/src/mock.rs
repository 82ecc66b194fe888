use crate as pallet_minter_pauser;
use crate::Role;
use frame_support::{derive_impl, parameter_types, traits::ConstU32};
use sp_runtime::BuildStorage;

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Token: pallet_minter_pauser,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type Block = Block;
    type AccountId = u64;
    type Lookup = sp_runtime::traits::IdentityLookup<Self::AccountId>;
}

parameter_types! {
    pub const IssuerAccount: u64 = 1;
    pub const MinterRole: Role = Role::Minter;
}

impl pallet_minter_pauser::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type MaxRoleMembers = ConstU32<4>;
    type MaxAllocations = ConstU32<8>;
    type WeightInfo = ();
}

fn build(genesis: pallet_minter_pauser::GenesisConfig<Test>) -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    genesis.assimilate_storage(&mut t).unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

// Token initialized at genesis by `IssuerAccount`, with two funded holders.
pub fn new_test_ext() -> sp_io::TestExternalities {
    build(pallet_minter_pauser::GenesisConfig::<Test> {
        issuer: Some(IssuerAccount::get()),
        token_name: b"DYNCV minter".to_vec(),
        token_symbol: b"DYNCV".to_vec(),
        decimals: 18,
        initial_balances: vec![(2, 1_000_000), (3, 500_000)],
        paused: false,
    })
}

// Fresh deployment: nothing initialized, empty ledger.
pub fn uninitialized_ext() -> sp_io::TestExternalities {
    build(pallet_minter_pauser::GenesisConfig::<Test>::default())
}
