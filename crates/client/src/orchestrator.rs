// Path: crates/client/src/orchestrator.rs

//! The contract lifecycle operations: create, accept, pay, claim and cancel.
//!
//! Requests carry raw user input. Each is checked for presence and type before
//! anything touches the network; business rules (paying a cancelled contract,
//! accepting twice) are left to the ledger and come back as a terminal status.

use crate::handle::ChainHandle;
use crate::reader::{ContractReader, ContractView};
use crate::submitter::{StatusStream, TransactionSubmitter};
use lease_crypto::{resolve_signer, Credential};
use lease_tx::ContractCall;
use lease_types::app::{parse_amount, ContractId, DiskType, NodeId, VolumeType};
use lease_types::error::LeaseError;
use std::str::FromStr;

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, LeaseError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LeaseError::Validation(format!("missing required {}", field))),
    }
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T, LeaseError> {
    raw.parse()
        .map_err(|_| LeaseError::Validation(format!("invalid {} '{}'", field, raw)))
}

/// Input of `create`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateRequest {
    pub node_id: Option<String>,
    pub disk_type: Option<String>,
    pub size: Option<String>,
}

impl CreateRequest {
    /// Checks that node id, disk type and size are present and well formed. A size
    /// of `0` is valid.
    pub fn validate(&self) -> Result<ContractCall, LeaseError> {
        let node_id = NodeId::new(required("node id", &self.node_id)?)?;
        let disk_type: u8 = parse_field("disk type", required("disk type", &self.disk_type)?)?;
        DiskType::try_from(disk_type)?;
        let size: u64 = parse_field("size", required("size", &self.size)?)?;
        Ok(ContractCall::CreateContract {
            node_id: node_id.to_bytes(),
            volume: VolumeType { disk_type, size },
        })
    }
}

/// Input of `pay`. The amount is a decimal in tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayRequest {
    pub contract_id: Option<String>,
    pub amount: Option<String>,
}

impl PayRequest {
    pub fn validate(&self) -> Result<ContractCall, LeaseError> {
        let contract_id = ContractRequest::parse_id(&self.contract_id)?;
        let amount = parse_amount(required("amount", &self.amount)?)?;
        if amount == 0 {
            return Err(LeaseError::Validation(
                "amount must be greater than zero".into(),
            ));
        }
        Ok(ContractCall::Pay {
            contract_id,
            amount,
        })
    }
}

/// Operations that take only a contract id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractAction {
    Accept,
    Claim,
    Cancel,
}

/// Input of `get`, `accept`, `claim` and `cancel`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractRequest {
    pub contract_id: Option<String>,
}

impl ContractRequest {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: Some(contract_id.into()),
        }
    }

    fn parse_id(raw: &Option<String>) -> Result<ContractId, LeaseError> {
        required("contract id", raw)?.parse()
    }

    pub fn contract_id(&self) -> Result<ContractId, LeaseError> {
        Self::parse_id(&self.contract_id)
    }

    pub fn validate(&self, action: ContractAction) -> Result<ContractCall, LeaseError> {
        let contract_id = self.contract_id()?;
        Ok(match action {
            ContractAction::Accept => ContractCall::AcceptContract { contract_id },
            ContractAction::Claim => ContractCall::ClaimFunds { contract_id },
            ContractAction::Cancel => ContractCall::CancelContract { contract_id },
        })
    }
}

/// The lifecycle façade used by the CLI.
#[derive(Clone, Debug)]
pub struct LeaseOrchestrator {
    submitter: TransactionSubmitter,
    reader: ContractReader,
}

impl LeaseOrchestrator {
    pub fn new(handle: ChainHandle) -> Self {
        Self {
            submitter: TransactionSubmitter::new(handle.clone()),
            reader: ContractReader::new(handle),
        }
    }

    pub fn from_parts(submitter: TransactionSubmitter, reader: ContractReader) -> Self {
        Self { submitter, reader }
    }

    pub fn reader(&self) -> &ContractReader {
        &self.reader
    }

    async fn submit(
        &self,
        call: Result<ContractCall, LeaseError>,
        credential: &Credential,
    ) -> Result<StatusStream, LeaseError> {
        let call = call?;
        let signer = resolve_signer(credential)?;
        log::debug!("{} as {}", call, signer.account_id());
        self.submitter.submit(call, &signer).await
    }

    /// Creates a contract. The id is known once the stream finalizes, from the
    /// `ContractAdded` event.
    pub async fn create(
        &self,
        request: &CreateRequest,
        credential: &Credential,
    ) -> Result<StatusStream, LeaseError> {
        self.submit(request.validate(), credential).await
    }

    /// Accepts a contract as provider, binding the signer as the contract's farmer.
    pub async fn accept(
        &self,
        request: &ContractRequest,
        credential: &Credential,
    ) -> Result<StatusStream, LeaseError> {
        self.submit(request.validate(ContractAction::Accept), credential)
            .await
    }

    /// Pays into a contract's escrow.
    pub async fn pay(
        &self,
        request: &PayRequest,
        credential: &Credential,
    ) -> Result<StatusStream, LeaseError> {
        self.submit(request.validate(), credential).await
    }

    /// Claims the funds accrued since the last claim, as provider.
    pub async fn claim(
        &self,
        request: &ContractRequest,
        credential: &Credential,
    ) -> Result<StatusStream, LeaseError> {
        self.submit(request.validate(ContractAction::Claim), credential)
            .await
    }

    /// Cancels a contract, as requester or provider.
    pub async fn cancel(
        &self,
        request: &ContractRequest,
        credential: &Credential,
    ) -> Result<StatusStream, LeaseError> {
        self.submit(request.validate(ContractAction::Cancel), credential)
            .await
    }

    pub async fn get(&self, request: &ContractRequest) -> Result<ContractView, LeaseError> {
        self.reader.get_contract(request.contract_id()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_create_requires_every_field() {
        let full = CreateRequest {
            node_id: s("node-1"),
            disk_type: s("2"),
            size: s("100"),
        };
        assert!(full.validate().is_ok());

        for missing in [
            CreateRequest { node_id: None, ..full.clone() },
            CreateRequest { disk_type: None, ..full.clone() },
            CreateRequest { size: None, ..full.clone() },
            CreateRequest { node_id: s("  "), ..full.clone() },
        ] {
            assert!(matches!(missing.validate(), Err(LeaseError::Validation(_))));
        }
    }

    #[test]
    fn test_create_accepts_zero_size() {
        let req = CreateRequest {
            node_id: s("node-1"),
            disk_type: s("1"),
            size: s("0"),
        };
        match req.validate().unwrap() {
            ContractCall::CreateContract { volume, node_id } => {
                assert_eq!(volume.size, 0);
                assert_eq!(node_id, b"node-1".to_vec());
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_bad_types() {
        let base = CreateRequest {
            node_id: s("node-1"),
            disk_type: s("2"),
            size: s("100"),
        };
        for bad in [
            CreateRequest { disk_type: s("ssd"), ..base.clone() },
            CreateRequest { disk_type: s("7"), ..base.clone() },
            CreateRequest { size: s("-1"), ..base.clone() },
            CreateRequest { node_id: s("node 1"), ..base.clone() },
        ] {
            assert!(matches!(bad.validate(), Err(LeaseError::Validation(_))), "{:?}", bad);
        }
    }

    #[test]
    fn test_pay_scales_and_requires_positive_amount() {
        let req = PayRequest {
            contract_id: s("3"),
            amount: s("1.5"),
        };
        assert_eq!(
            req.validate().unwrap(),
            ContractCall::Pay {
                contract_id: ContractId(3),
                amount: 1_500_000_000_000
            }
        );
        for amount in ["0", "0.000", "abc", ""] {
            let req = PayRequest {
                contract_id: s("3"),
                amount: s(amount),
            };
            assert!(req.validate().is_err(), "{}", amount);
        }
        assert!(PayRequest { contract_id: None, amount: s("1") }.validate().is_err());
    }

    #[test]
    fn test_contract_actions_map_to_calls() {
        let req = ContractRequest::new("9");
        assert_eq!(
            req.validate(ContractAction::Claim).unwrap().name(),
            "claimFunds"
        );
        assert_eq!(
            req.validate(ContractAction::Cancel).unwrap().contract_id(),
            Some(ContractId(9))
        );
        assert!(ContractRequest::default().validate(ContractAction::Accept).is_err());
        assert!(ContractRequest::new("x1").contract_id().is_err());
    }
}
