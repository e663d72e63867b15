#![no_main]

use arbitrary::Arbitrary;
use fhe_coprocessor::{FheCoprocessorContract, FheCoprocessorContractClient};
use libfuzzer_sys::fuzz_target;
use liquidity_ledger::{EncryptedFields, LiquidityLedgerContract, LiquidityLedgerContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    Address, Env,
};

/// Ledger actions driven by the fuzzer. Amounts are `u32` so that sums over
/// any realistic sequence cannot wrap.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Submit { institution: u8, values: [u32; 5] },
    RequestReveal { institution: u8, report_id: u8 },
    Deliver { slot: u8 },
    Aggregate,
    RequestMarketRatio,
    Pause,
    Unpause,
    AdvanceTime { delta: u16 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let regulator = Address::generate(&env);
    let gateway = Address::generate(&env);

    let fhe_id = env.register(FheCoprocessorContract, ());
    let fhe = FheCoprocessorContractClient::new(&env, &fhe_id);
    fhe.initialize(&admin, &gateway);

    let ledger_id = env.register(LiquidityLedgerContract, ());
    let ledger = LiquidityLedgerContractClient::new(&env, &ledger_id);
    if ledger
        .try_initialize(&admin, &regulator, &fhe_id, &gateway)
        .is_err()
    {
        return;
    }

    let institutions: Vec<Address> = (0..3).map(|_| Address::generate(&env)).collect();
    let mut submitted: Vec<[u64; 5]> = Vec::new();
    let mut issued: Vec<u64> = Vec::new();

    for action in actions.into_iter().take(48) {
        match action {
            FuzzAction::Submit { institution, values } => {
                let who = &institutions[institution as usize % institutions.len()];
                let plain = values.map(u64::from);
                let h: Vec<_> = plain
                    .iter()
                    .map(|v| {
                        let handle = fhe.encrypt(who, v);
                        fhe.allow(who, &handle, &ledger_id);
                        handle
                    })
                    .collect();
                let fields = EncryptedFields {
                    liquid_assets: h[0].clone(),
                    total_assets: h[1].clone(),
                    current_liabilities: h[2].clone(),
                    total_liabilities: h[3].clone(),
                    net_capital: h[4].clone(),
                };
                if let Ok(Ok(id)) = ledger.try_submit(who, &fields) {
                    assert_eq!(id, submitted.len() as u64 + 1, "INVARIANT VIOLATION: id gap");
                    submitted.push(plain);
                }
            }
            FuzzAction::RequestReveal { institution, report_id } => {
                let who = &institutions[institution as usize % institutions.len()];
                if let Ok(Ok(request_id)) =
                    ledger.try_request_metrics_decryption(who, &u64::from(report_id))
                {
                    issued.push(request_id);
                }
            }
            FuzzAction::Deliver { slot } => {
                if issued.is_empty() {
                    continue;
                }
                let request_id = issued[slot as usize % issued.len()];
                let att = fhe.attest(&gateway, &request_id);
                match ledger.get_pending_request(&request_id).target {
                    liquidity_ledger::DecryptionTarget::Report(_) => {
                        let _ = ledger.try_resolve_institution_metrics(
                            &gateway,
                            &request_id,
                            &att.plaintexts,
                            &att.proof,
                        );
                    }
                    liquidity_ledger::DecryptionTarget::Market(_) => {
                        let _ = ledger.try_resolve_market_ratio(
                            &gateway,
                            &request_id,
                            &att.plaintexts,
                            &att.proof,
                        );
                    }
                }
            }
            FuzzAction::Aggregate => {
                let _ = ledger.try_aggregate_market_risk(&regulator);
            }
            FuzzAction::RequestMarketRatio => {
                if let Ok(Ok(request_id)) = ledger.try_request_market_ratio_decryption(&regulator) {
                    issued.push(request_id);
                }
            }
            FuzzAction::Pause => {
                let _ = ledger.try_pause(&admin);
            }
            FuzzAction::Unpause => {
                let _ = ledger.try_unpause(&admin);
            }
            FuzzAction::AdvanceTime { delta } => {
                let ts = env.ledger().timestamp().saturating_add(delta as u64);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        assert_eq!(ledger.get_report_count(), submitted.len() as u64);
        for (i, plain) in submitted.iter().enumerate() {
            let id = i as u64 + 1;
            let m = ledger.get_decrypted_metrics(&id);
            if m.is_revealed {
                let got = [
                    m.liquid_assets,
                    m.total_assets,
                    m.current_liabilities,
                    m.total_liabilities,
                    m.net_capital,
                ];
                assert_eq!(&got, plain, "INVARIANT VIOLATION: reveal differs from submission");
            }
        }

        if let Ok(Ok(result)) = ledger.try_get_market_ratio() {
            if result.is_revealed {
                let snap = ledger.get_aggregated_metrics();
                let counted = &submitted[..snap.report_count as usize];
                let liquid: u64 = counted.iter().map(|p| p[0]).sum();
                let liabilities: u64 = counted.iter().map(|p| p[2]).sum();
                let expected = liquid.checked_div(liabilities).unwrap_or(u64::MAX);
                assert_eq!(result.liquidity_ratio, expected, "INVARIANT VIOLATION: market ratio");
            }
        }
    }
});
