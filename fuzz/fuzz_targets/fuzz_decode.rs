#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must fail cleanly, never panic.
    let _ = token_store::StateKey::decode(data);
    let _ = token_ledger::LedgerSnapshot::from_bytes(data);
    let _ = bincode::deserialize::<token_types::AccountId>(data);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<token_types::TokenAmount>();
    }
});
