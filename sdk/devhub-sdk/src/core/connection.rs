use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

/// Network operations the ledger client depends on.
///
/// `send_transaction` has send-and-confirm semantics: it returns only once
/// the cluster has confirmed the transaction. `request_airdrop` likewise
/// confirms before returning, so a following balance query observes the
/// credit.
#[async_trait]
pub trait SolConnection: Send + Sync {
    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>>;
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>>;
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, Box<dyn Error + Send + Sync>>;
    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>>;
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, Box<dyn Error + Send + Sync>>;
    async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>>;
}

/// Connection settings host applications can load from their own config
/// files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON RPC endpoint.
    pub rpc_url: String,
    /// Commitment level used for reads and confirmation
    /// ("processed", "confirmed", "finalized").
    #[serde(default = "default_commitment")]
    pub commitment: String,
    /// Per-request timeout in seconds; the transport default applies when
    /// unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: default_commitment(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn build(&self) -> crate::error::Result<RpcConnection> {
        let level = self.commitment.parse::<CommitmentLevel>().map_err(|e| {
            crate::error::LedgerSdkError::Connection(format!(
                "invalid commitment '{}': {e}",
                self.commitment
            ))
        })?;
        let commitment = CommitmentConfig { commitment: level };
        Ok(match self.timeout_secs {
            Some(secs) => RpcConnection::new_with_timeout_and_commitment(
                self.rpc_url.clone(),
                Duration::from_secs(secs),
                commitment,
            ),
            None => RpcConnection::new_with_commitment(self.rpc_url.clone(), commitment),
        })
    }
}

const AIRDROP_CONFIRM_ATTEMPTS: u32 = 30;
const AIRDROP_CONFIRM_INTERVAL: Duration = Duration::from_millis(500);

/// RPC-backed connection over the nonblocking client.
pub struct RpcConnection {
    client: RpcClient,
}

impl RpcConnection {
    pub fn new(url: impl ToString) -> Self {
        Self::new_with_commitment(url, CommitmentConfig::confirmed())
    }

    pub fn new_with_commitment(url: impl ToString, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.to_string(), commitment),
        }
    }

    pub fn new_with_timeout_and_commitment(
        url: impl ToString,
        timeout: Duration,
        commitment: CommitmentConfig,
    ) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(
                url.to_string(),
                timeout,
                commitment,
            ),
        }
    }
}

#[async_trait]
impl SolConnection for RpcConnection {
    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        self.client
            .send_and_confirm_transaction(tx)
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)
    }

    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .get_account_with_commitment(pubkey, self.client.commitment())
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;
        Ok(response.value)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, Box<dyn Error + Send + Sync>> {
        self.client
            .get_balance(pubkey)
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, Box<dyn Error + Send + Sync>> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)
    }

    async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        let signature = self
            .client
            .request_airdrop(pubkey, lamports)
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;
        for _ in 0..AIRDROP_CONFIRM_ATTEMPTS {
            let confirmed = self
                .client
                .confirm_transaction(&signature)
                .await
                .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;
            if confirmed {
                return Ok(signature);
            }
            tokio::time::sleep(AIRDROP_CONFIRM_INTERVAL).await;
        }
        Err(format!("airdrop {signature} not confirmed in time").into())
    }
}
