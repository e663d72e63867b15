use soroban_sdk::{Env, IntoVal, Val};

/// ~1 day at ~5 s per ledger.
pub const TTL_THRESHOLD: u32 = 17_280;
/// ~30 days at ~5 s per ledger.
pub const TTL_EXTEND_TO: u32 = 518_400;

/// Extends a persistent entry so append-only records outlive inactivity.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extends the contract instance (configuration and counters).
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}
