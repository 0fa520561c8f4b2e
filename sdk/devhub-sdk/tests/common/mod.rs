use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use devhub_sdk::state::{DeviceLedger, DeviceRecord};
use devhub_sdk::SolConnection;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::rent::Rent;
use solana_sdk::signature::Signature;
use solana_sdk::system_instruction::SystemInstruction;
use solana_sdk::system_program;
use solana_sdk::transaction::Transaction;

/// In-memory bank standing in for a cluster.
///
/// Interprets the system create-with-seed instruction and the ledger
/// program's register/charge opcodes, so scenario tests can observe ledger
/// effects end to end without a validator. Clones share state.
#[derive(Clone)]
pub struct MockConnection {
    pub program_id: Pubkey,
    state: Arc<MockState>,
}

struct MockState {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    balances: Mutex<HashMap<Pubkey, u64>>,
    sent: Mutex<Vec<Transaction>>,
    created: Mutex<u32>,
    airdrops: Mutex<u32>,
}

impl MockConnection {
    /// A bank with the ledger program already deployed.
    pub fn new() -> Self {
        let connection = Self::new_without_program();
        connection.state.accounts.lock().unwrap().insert(
            connection.program_id,
            Account {
                lamports: 1,
                data: vec![],
                owner: solana_sdk::bpf_loader::id(),
                executable: true,
                rent_epoch: 0,
            },
        );
        connection
    }

    pub fn new_without_program() -> Self {
        Self {
            program_id: Pubkey::new_unique(),
            state: Arc::new(MockState {
                accounts: Mutex::new(HashMap::new()),
                balances: Mutex::new(HashMap::new()),
                sent: Mutex::new(Vec::new()),
                created: Mutex::new(0),
                airdrops: Mutex::new(0),
            }),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.state.sent.lock().unwrap().len()
    }

    pub fn created_accounts(&self) -> u32 {
        *self.state.created.lock().unwrap()
    }

    pub fn airdrop_count(&self) -> u32 {
        *self.state.airdrops.lock().unwrap()
    }

    pub fn set_balance(&self, pubkey: Pubkey, lamports: u64) {
        self.state.balances.lock().unwrap().insert(pubkey, lamports);
    }

    fn process(&self, tx: &Transaction) -> Result<(), String> {
        let message = &tx.message;
        for ix in &message.instructions {
            let program = message.account_keys[ix.program_id_index as usize];
            let keys: Vec<Pubkey> = ix
                .accounts
                .iter()
                .map(|&index| message.account_keys[index as usize])
                .collect();
            if program == system_program::id() {
                self.process_system_instruction(&ix.data)?;
            } else if program == self.program_id {
                self.process_ledger_instruction(&keys, &ix.data)?;
            } else {
                return Err(format!("unknown program {program}"));
            }
        }
        Ok(())
    }

    fn process_system_instruction(&self, data: &[u8]) -> Result<(), String> {
        match bincode::deserialize::<SystemInstruction>(data) {
            Ok(SystemInstruction::CreateAccountWithSeed {
                base,
                seed,
                lamports,
                space,
                owner,
            }) => {
                let address =
                    Pubkey::create_with_seed(&base, &seed, &owner).map_err(|e| e.to_string())?;
                let mut accounts = self.state.accounts.lock().unwrap();
                if accounts.contains_key(&address) {
                    return Err(format!("account {address} already in use"));
                }
                accounts.insert(
                    address,
                    Account {
                        lamports,
                        data: vec![0; space as usize],
                        owner,
                        executable: false,
                        rent_epoch: 0,
                    },
                );
                *self.state.created.lock().unwrap() += 1;
                Ok(())
            }
            Ok(other) => Err(format!("unsupported system instruction {other:?}")),
            Err(e) => Err(format!("undecodable system instruction: {e}")),
        }
    }

    fn process_ledger_instruction(&self, keys: &[Pubkey], data: &[u8]) -> Result<(), String> {
        let (&opcode, payload) = data.split_first().ok_or("empty instruction data")?;
        let mut accounts = self.state.accounts.lock().unwrap();
        match opcode {
            0 => {
                let record = DeviceRecord::decode(payload).map_err(|e| e.to_string())?;
                let holder = accounts
                    .get_mut(&keys[1])
                    .ok_or("device list account missing")?;
                let mut ledger = DeviceLedger::decode(&holder.data).map_err(|e| e.to_string())?;
                ledger.count += 1;
                ledger.entries.push(record);
                holder.data = ledger.encode().map_err(|e| e.to_string())?;
                Ok(())
            }
            1 => {
                let (&amount, mac) = payload.split_last().ok_or("short charge payload")?;
                let mac = std::str::from_utf8(mac).map_err(|e| e.to_string())?;
                let holder = accounts
                    .get_mut(&keys[1])
                    .ok_or("device list account missing")?;
                let mut ledger = DeviceLedger::decode(&holder.data).map_err(|e| e.to_string())?;
                let entry = ledger
                    .entries
                    .iter_mut()
                    .find(|device| device.mac_address == mac)
                    .ok_or("unknown device")?;
                entry.token_balance += u64::from(amount);
                holder.data = ledger.encode().map_err(|e| e.to_string())?;
                Ok(())
            }
            // Miner bookkeeping is not modeled; accept the claim.
            2 => Ok(()),
            other => Err(format!("invalid opcode {other}")),
        }
    }
}

#[async_trait]
impl SolConnection for MockConnection {
    async fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        self.process(tx)
            .map_err(|e| Box::<dyn Error + Send + Sync>::from(e))?;
        self.state.sent.lock().unwrap().push(tx.clone());
        Ok(tx.signatures.first().copied().unwrap_or_default())
    }

    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>> {
        Ok(self.state.accounts.lock().unwrap().get(pubkey).cloned())
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(*self
            .state
            .balances
            .lock()
            .unwrap()
            .get(pubkey)
            .unwrap_or(&0))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>> {
        Ok(Hash::default())
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(Rent::default().minimum_balance(data_len))
    }

    async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        *self
            .state
            .balances
            .lock()
            .unwrap()
            .entry(*pubkey)
            .or_insert(0) += lamports;
        *self.state.airdrops.lock().unwrap() += 1;
        Ok(Signature::default())
    }
}
