use std::env;
use std::time::Duration;
use txguard_core::BASE_CHAIN_ID;
use txguard_rpc::{RpcConfig, DEFAULT_ENDPOINT};

// Um único teste: as variáveis de ambiente são globais ao processo
#[test]
fn env_overrides_and_fallbacks() {
    for key in ["TXGUARD_RPC_URL", "TXGUARD_RPC_TIMEOUT_MS", "TXGUARD_CHAIN_ID"] {
        env::remove_var(key);
    }
    let config = RpcConfig::from_env();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.chain_id, Some(BASE_CHAIN_ID));

    env::set_var("TXGUARD_RPC_URL", "http://localhost:8545");
    env::set_var("TXGUARD_RPC_TIMEOUT_MS", "1500");
    env::set_var("TXGUARD_CHAIN_ID", "84532");
    let config = RpcConfig::from_env();
    assert_eq!(config.endpoint, "http://localhost:8545");
    assert_eq!(config.timeout, Duration::from_millis(1500));
    assert_eq!(config.chain_id, Some(84532));

    // valor inválido mantém a verificação da Base
    env::set_var("TXGUARD_CHAIN_ID", "base");
    env::set_var("TXGUARD_RPC_TIMEOUT_MS", "rápido");
    let config = RpcConfig::from_env();
    assert_eq!(config.chain_id, Some(BASE_CHAIN_ID));
    assert_eq!(config.timeout, Duration::from_secs(30));

    env::set_var("TXGUARD_CHAIN_ID", "");
    assert_eq!(RpcConfig::from_env().chain_id, Some(BASE_CHAIN_ID));

    env::set_var("TXGUARD_CHAIN_ID", "any");
    assert_eq!(RpcConfig::from_env().chain_id, None);

    for key in ["TXGUARD_RPC_URL", "TXGUARD_RPC_TIMEOUT_MS", "TXGUARD_CHAIN_ID"] {
        env::remove_var(key);
    }
}
