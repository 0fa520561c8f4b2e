use devhub_state::{DeviceLedger, MinerLedger};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info};

use crate::command::LedgerCommand;
use crate::core::connection::SolConnection;
use crate::core::constants::{
    DEVICE_LIST_SEED, DEVICE_LIST_SPACE, MINER_LIST_SEED, MINER_LIST_SPACE,
    SIGNATURE_FEE_ALLOWANCE,
};
use crate::error::{LedgerSdkError, Result};
use crate::instructions;
use crate::utils;

/// Setup progress of a client session.
///
/// Transitions are one-directional; re-invoking a completed step is a no-op
/// and never regresses the stage or re-submits setup transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStage {
    Disconnected,
    Connected,
    PayerFunded,
    ProgramVerified,
    Ready,
}

/// The two derived shared ledger account addresses.
///
/// Computed once per session after the authority and program identity are
/// known; never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct LedgerAccounts {
    pub device_list: Pubkey,
    pub miner_list: Pubkey,
}

/// Client session for the device ledger program.
///
/// Owns the payer credential, the derived account addresses, and the setup
/// state machine. Setup transitions take `&mut self`, so two setup sequences
/// cannot race on one session. [`LedgerClient::submit`] is the only
/// operation that mutates on-chain state; everything else is a read-only
/// query against already-derived addresses.
pub struct LedgerClient<C: SolConnection> {
    connection: C,
    payer: Keypair,
    program_id: Pubkey,
    stage: SetupStage,
    accounts: Option<LedgerAccounts>,
}

impl<C: SolConnection> LedgerClient<C> {
    pub fn new(connection: C, payer: Keypair, program_id: Pubkey) -> Self {
        Self {
            connection,
            payer,
            program_id,
            stage: SetupStage::Disconnected,
            accounts: None,
        }
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Derived ledger account refs, available from `ProgramVerified` on.
    pub fn accounts(&self) -> Result<LedgerAccounts> {
        self.accounts.ok_or(LedgerSdkError::NotReady {
            required: SetupStage::ProgramVerified,
            current: self.stage,
        })
    }

    fn require_stage(&self, required: SetupStage) -> Result<()> {
        if self.stage >= required {
            Ok(())
        } else {
            Err(LedgerSdkError::NotReady {
                required,
                current: self.stage,
            })
        }
    }

    /// Probe the cluster and mark the session connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.stage >= SetupStage::Connected {
            return Ok(());
        }
        self.connection
            .get_latest_blockhash()
            .await
            .map_err(|e| LedgerSdkError::Connection(e.to_string()))?;
        info!("connection to cluster established");
        self.stage = SetupStage::Connected;
        Ok(())
    }

    /// Make sure the payer can cover holder-account rent and transaction
    /// fees, requesting an airdrop for any shortfall.
    pub async fn establish_payer(&mut self) -> Result<()> {
        self.require_stage(SetupStage::Connected)?;
        if self.stage >= SetupStage::PayerFunded {
            return Ok(());
        }

        let rent = self
            .connection
            .get_minimum_balance_for_rent_exemption(DeviceLedger::BASE_SIZE)
            .await
            .map_err(|e| LedgerSdkError::Connection(e.to_string()))?;
        let required = rent + SIGNATURE_FEE_ALLOWANCE;

        let payer = self.payer.pubkey();
        let balance = self
            .connection
            .get_balance(&payer)
            .await
            .map_err(|e| LedgerSdkError::Connection(e.to_string()))?;
        if balance < required {
            let shortfall = required - balance;
            info!(%payer, shortfall, "requesting airdrop");
            self.connection
                .request_airdrop(&payer, shortfall)
                .await
                .map_err(|e| LedgerSdkError::SubmissionFailed {
                    step: "airdrop",
                    reason: e.to_string(),
                })?;
        }
        debug!(%payer, "payer funded");
        self.stage = SetupStage::PayerFunded;
        Ok(())
    }

    /// Check the ledger program is deployed and executable, then derive and
    /// cache the holder addresses.
    pub async fn verify_program(&mut self) -> Result<()> {
        self.require_stage(SetupStage::PayerFunded)?;
        if self.stage >= SetupStage::ProgramVerified {
            return Ok(());
        }

        let program = self
            .connection
            .get_account(&self.program_id)
            .await
            .map_err(|e| LedgerSdkError::Connection(e.to_string()))?
            .ok_or(LedgerSdkError::ProgramNotDeployed(self.program_id))?;
        if !program.executable {
            return Err(LedgerSdkError::ProgramNotExecutable(self.program_id));
        }

        let payer = self.payer.pubkey();
        let device_list = utils::derive_device_list_address(&payer, &self.program_id)?;
        let miner_list = utils::derive_miner_list_address(&payer, &self.program_id)?;
        info!(program = %self.program_id, %device_list, %miner_list, "program verified");
        self.accounts = Some(LedgerAccounts {
            device_list,
            miner_list,
        });
        self.stage = SetupStage::ProgramVerified;
        Ok(())
    }

    /// Create any holder account that does not exist yet, sized to the empty
    /// ledger encoding and funded to rent exemption. Existing accounts are
    /// left untouched.
    pub async fn ensure_ledger_accounts(&mut self) -> Result<()> {
        self.require_stage(SetupStage::ProgramVerified)?;
        if self.stage >= SetupStage::Ready {
            return Ok(());
        }

        let accounts = self.accounts()?;
        self.create_holder_if_missing(&accounts.device_list, DEVICE_LIST_SEED, DEVICE_LIST_SPACE)
            .await?;
        self.create_holder_if_missing(&accounts.miner_list, MINER_LIST_SEED, MINER_LIST_SPACE)
            .await?;
        self.stage = SetupStage::Ready;
        Ok(())
    }

    async fn create_holder_if_missing(
        &self,
        address: &Pubkey,
        seed: &str,
        space: u64,
    ) -> Result<()> {
        let existing = self
            .connection
            .get_account(address)
            .await
            .map_err(|e| LedgerSdkError::Connection(e.to_string()))?;
        if existing.is_some() {
            debug!(%address, seed, "holder account already exists");
            return Ok(());
        }

        let lamports = self
            .connection
            .get_minimum_balance_for_rent_exemption(space as usize)
            .await
            .map_err(|e| LedgerSdkError::Connection(e.to_string()))?;
        let payer = self.payer.pubkey();
        let ix = system_instruction::create_account_with_seed(
            &payer,
            address,
            &payer,
            seed,
            lamports,
            space,
            &self.program_id,
        );
        info!(%address, seed, space, "creating holder account");
        self.send(&[ix], "create holder account").await?;
        Ok(())
    }

    /// Run the full setup sequence. Safe to run against an
    /// already-initialized ledger; completed steps and existing accounts are
    /// left untouched.
    pub async fn setup(&mut self) -> Result<()> {
        self.connect().await?;
        self.establish_payer().await?;
        self.verify_program().await?;
        self.ensure_ledger_accounts().await
    }

    /// Encode and submit a mutating command, waiting for confirmation.
    ///
    /// Encoding errors surface before anything touches the network. A failed
    /// submission is not retried here: whether the command was applied must
    /// be checked before resubmitting, and that is the caller's call.
    pub async fn submit(&mut self, command: LedgerCommand) -> Result<Signature> {
        self.require_stage(SetupStage::Ready)?;
        let accounts = self.accounts()?;
        let ix = instructions::build_command(
            &command,
            &self.program_id,
            &self.payer.pubkey(),
            &accounts.device_list,
            &accounts.miner_list,
        )?;
        debug!(opcode = command.opcode(), "submitting ledger command");
        self.send(&[ix], "submit command").await
    }

    /// Fetch and decode the device list account.
    pub async fn fetch_ledger(&self) -> Result<DeviceLedger> {
        let accounts = self.accounts()?;
        utils::fetch_device_ledger(&self.connection, &accounts.device_list).await
    }

    /// Fetch and decode the miner list account.
    pub async fn fetch_miners(&self) -> Result<MinerLedger> {
        let accounts = self.accounts()?;
        utils::fetch_miner_ledger(&self.connection, &accounts.miner_list).await
    }

    async fn send(&self, instructions: &[Instruction], step: &'static str) -> Result<Signature> {
        let blockhash = self
            .connection
            .get_latest_blockhash()
            .await
            .map_err(|e| LedgerSdkError::SubmissionFailed {
                step,
                reason: e.to_string(),
            })?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &[&self.payer],
            blockhash,
        );
        self.connection
            .send_transaction(&tx)
            .await
            .map_err(|e| LedgerSdkError::SubmissionFailed {
                step,
                reason: e.to_string(),
            })
    }
}
