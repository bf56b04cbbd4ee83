use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ethereum_types::Address;
use tracing::info;
use txguard_core::utils;
use txguard_preflight::{
    CheckOutcome, FileCounterStore, PreflightConfig, PreflightEvaluator, RecipientResolver,
    Resolution, TransferGuard,
};
use txguard_rpc::{RpcConfig, SignerWallet, TxGuardRpcClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Uso: {} <REMETENTE> <DESTINATARIO|NOME> <VALOR_USDC> [--send]", args[0]);
        std::process::exit(1);
    }
    let sender: Address = utils::hex_to_address(&args[1]).context("remetente invalido")?;
    let send = args.iter().skip(4).any(|a| a == "--send");

    let rpc_config = RpcConfig::from_env();
    let client = Arc::new(
        TxGuardRpcClient::new(rpc_config.clone())
            .await
            .context("falha ao conectar ao node")?,
    );

    // nomes passam pelo resolver; endereços seguem como digitados
    let recipient = match RecipientResolver::new(client.clone()).resolve(&args[2]).await {
        Resolution::Resolved(address) if !utils::is_valid_address(args[2].trim()) => {
            info!("{} resolvido para {}", args[2], utils::to_checksum(&address));
            utils::to_checksum(&address)
        }
        Resolution::Failed(e) => bail!("falha ao resolver {}: {}", args[2], e),
        _ => args[2].clone(),
    };

    let config = match env::var("TXGUARD_CONFIG") {
        Ok(path) => PreflightConfig::from_json_file(&path).context("configuracao invalida")?,
        Err(_) => PreflightConfig::default(),
    };
    let stats_dir = env::var("TXGUARD_STATS_DIR").unwrap_or_else(|_| ".".to_string());

    let evaluator = PreflightEvaluator::with_config(client, config)?;
    let guard = TransferGuard::new(evaluator, Arc::new(FileCounterStore::new(stats_dir)));

    let verdict = match guard.check(sender, &recipient, &args[3]).await? {
        CheckOutcome::Applied(verdict) => verdict,
        CheckOutcome::Stale => bail!("verificacao descartada"),
    };
    println!("{}", verdict);

    if send {
        let key = env::var("TXGUARD_PRIVATE_KEY").context("TXGUARD_PRIVATE_KEY ausente")?;
        let wallet = SignerWallet::new(rpc_config, &key).context("chave invalida")?;
        let hash = guard.send_approved(&wallet).await?;
        println!("Transacao enviada: {:?}", hash);
    }

    let stats = guard.stats();
    println!(
        "Transferencias prevenidas: {} | bem-sucedidas: {}",
        stats.prevented, stats.successful
    );
    Ok(())
}
