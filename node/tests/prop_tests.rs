use proptest::prelude::*;

use token_node::{handle_line, InvokeRequest, LedgerHost, NodeConfig};
use token_nullables::NullStore;

const ACCOUNTS: [&str; 5] = ["issuer", "alice", "bob", "carol", ""];
const SUPPLY: u64 = 50_000;

fn account() -> impl Strategy<Value = String> {
    prop::sample::select(ACCOUNTS.to_vec()).prop_map(String::from)
}

fn raw_amount() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (0u64..=SUPPLY / 2).prop_map(|v| v.to_string()),
        1 => Just("-1".to_string()),
        1 => Just("18446744073709551616".to_string()),
    ]
}

fn request() -> impl Strategy<Value = InvokeRequest> {
    let op = |name: &str, args: Vec<String>| InvokeRequest {
        op: name.to_string(),
        args,
    };
    prop_oneof![
        (account(), account(), raw_amount())
            .prop_map(move |(a, b, n)| op("transfer", vec![a, b, n])),
        (account(), account(), account(), raw_amount())
            .prop_map(move |(a, b, s, n)| op("transferFrom", vec![a, b, s, n])),
        (account(), account(), raw_amount())
            .prop_map(move |(s, o, n)| op("approve", vec![s, o, n])),
        account().prop_map(move |a| op("balanceOf", vec![a])),
        (account(), account()).prop_map(move |(s, o)| op("allowance", vec![s, o])),
    ]
}

fn host() -> LedgerHost<NullStore> {
    let config = NodeConfig {
        total_supply: SUPPLY,
        issuer: Some("issuer".into()),
        ..NodeConfig::default()
    };
    LedgerHost::new(NullStore::new(), &config).unwrap()
}

proptest! {
    /// Request lines through the host never create or destroy tokens, and a
    /// rejected line leaves the ledger as it was.
    #[test]
    fn request_lines_conserve_supply(requests in prop::collection::vec(request(), 1..50)) {
        let host = host();
        for req in &requests {
            let line = serde_json::to_string(req).unwrap();
            let before = host.snapshot().unwrap();
            let resp = handle_line(&host, &line);
            let after = host.snapshot().unwrap();

            prop_assert_eq!(after.circulating(), u128::from(SUPPLY));
            prop_assert!(after.balance(&"".into()).is_none());
            if !resp.ok {
                prop_assert!(resp.kind.is_some());
                prop_assert_eq!(after, before);
            }
        }
    }
}
