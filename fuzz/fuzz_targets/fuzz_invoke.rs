#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use token_ledger::{GenesisConfig, LedgerState};
use token_nullables::NullStore;
use token_types::{AccountId, TokenAmount};

const SUPPLY: u64 = 1_000_000;
const NAMES: [&str; 8] = [
    "init",
    "balanceOf",
    "transfer",
    "transferFrom",
    "approve",
    "totalSupply",
    "allowance",
    "burn",
];

#[derive(Arbitrary, Debug)]
struct Call {
    name: u8,
    args: Vec<String>,
}

fuzz_target!(|calls: Vec<Call>| {
    // Arbitrary call sequences must never panic, and must never create or
    // destroy tokens.
    let issuer = AccountId::new("issuer");
    let genesis = GenesisConfig::new(TokenAmount::new(SUPPLY)).with_issuer(issuer);
    let mut ledger = LedgerState::new(NullStore::new(), genesis);
    ledger.initialize().unwrap();

    for call in calls.iter().take(64) {
        let name = NAMES[call.name as usize % NAMES.len()];
        let before = ledger.snapshot().unwrap();
        let result = ledger.invoke(name, &call.args);
        let after = ledger.snapshot().unwrap();

        assert_eq!(after.circulating(), u128::from(SUPPLY));
        if result.is_err() {
            assert_eq!(before, after);
        }
    }
});
