#![no_main]

use arbitrary::Arbitrary;
use fhe_coprocessor::{FheCoprocessorContract, FheCoprocessorContractClient};
use libfuzzer_sys::fuzz_target;
use liquidity_ledger::{EncryptedFields, LiquidityLedgerContract, LiquidityLedgerContractClient};
use soroban_sdk::{testutils::Address as _, Address, BytesN, Env, Vec as SorobanVec};

/// An adversarial gateway delivery: arbitrary plaintexts and proof for an
/// arbitrary request id.
#[derive(Arbitrary, Debug)]
pub struct ForgedCallback {
    pub request_id: u8,
    pub plaintexts: Vec<u64>,
    pub proof: [u8; 32],
    pub market: bool,
}

fuzz_target!(|input: (u32, Vec<ForgedCallback>)| {
    let (secret, callbacks) = input;

    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let regulator = Address::generate(&env);
    let gateway = Address::generate(&env);
    let institution = Address::generate(&env);

    let fhe_id = env.register(FheCoprocessorContract, ());
    let fhe = FheCoprocessorContractClient::new(&env, &fhe_id);
    fhe.initialize(&admin, &gateway);

    let ledger_id = env.register(LiquidityLedgerContract, ());
    let ledger = LiquidityLedgerContractClient::new(&env, &ledger_id);
    ledger.initialize(&admin, &regulator, &fhe_id, &gateway);

    let handle = |v: u64| {
        let h = fhe.encrypt(&institution, &v);
        fhe.allow(&institution, &h, &ledger_id);
        h
    };
    let value = u64::from(secret);
    let fields = EncryptedFields {
        liquid_assets: handle(value),
        total_assets: handle(value),
        current_liabilities: handle(value),
        total_liabilities: handle(value),
        net_capital: handle(value),
    };
    let id = ledger.submit(&institution, &fields);
    ledger.request_metrics_decryption(&institution, &id);
    ledger.aggregate_market_risk(&regulator);
    ledger.request_market_ratio_decryption(&regulator);

    // Without a gateway attestation no callback may succeed.
    for cb in callbacks.into_iter().take(32) {
        let mut plaintexts = SorobanVec::new(&env);
        for p in cb.plaintexts.iter().take(8) {
            plaintexts.push_back(*p);
        }
        let proof = BytesN::from_array(&env, &cb.proof);
        let request_id = u64::from(cb.request_id);

        let accepted = if cb.market {
            matches!(
                ledger.try_resolve_market_ratio(&gateway, &request_id, &plaintexts, &proof),
                Ok(Ok(_))
            )
        } else {
            matches!(
                ledger.try_resolve_institution_metrics(&gateway, &request_id, &plaintexts, &proof),
                Ok(Ok(_))
            )
        };
        assert!(!accepted, "INVARIANT VIOLATION: unattested callback accepted");
    }

    assert!(!ledger.get_decrypted_metrics(&id).is_revealed);
    assert!(!ledger.get_market_ratio().is_revealed);
});
