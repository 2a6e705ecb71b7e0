//! Requests that drive registry state transitions.
//!
//! Every request carries the acting identity. `validate_basic` performs the
//! stateless checks and must pass before the registry touches storage.

use crate::errors::{RegistryError, Result};
use nameservice_types::{Address, Coins};
use serde::{Deserialize, Serialize};

/// Route under which all registry requests are dispatched.
pub const ROUTER_KEY: &str = "nameservice";

fn require_signer(signer: &Address) -> Result<()> {
    if signer.is_empty() {
        return Err(RegistryError::InvalidRequest(
            "acting address cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RegistryError::InvalidRequest(
            "name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Point `name` at a new value. Only the owner may do this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetValueRequest {
    pub name: String,
    pub value: String,
    pub owner: Address,
}

impl SetValueRequest {
    pub fn new(name: impl Into<String>, value: impl Into<String>, owner: Address) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            owner,
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        require_signer(&self.owner)?;
        if self.name.is_empty() || self.value.is_empty() {
            return Err(RegistryError::InvalidRequest(
                "name and/or value cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bid for `name`. Succeeds when the bid beats the current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyRequest {
    pub name: String,
    pub bid: Coins,
    pub buyer: Address,
}

impl BuyRequest {
    pub fn new(name: impl Into<String>, bid: Coins, buyer: Address) -> Self {
        Self {
            name: name.into(),
            bid,
            buyer,
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        require_signer(&self.buyer)?;
        require_name(&self.name)?;
        if !self.bid.is_all_positive() {
            return Err(RegistryError::InvalidRequest(
                "bid must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Give `name` up, returning it to the un-owned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub name: String,
    pub owner: Address,
}

impl ReleaseRequest {
    pub fn new(name: impl Into<String>, owner: Address) -> Self {
        Self {
            name: name.into(),
            owner,
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        require_signer(&self.owner)?;
        require_name(&self.name)
    }
}

/// Any registry request, tagged by kind on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    SetName(SetValueRequest),
    BuyName(BuyRequest),
    DeleteName(ReleaseRequest),
}

impl Request {
    pub fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Request::SetName(_) => "set_name",
            Request::BuyName(_) => "buy_name",
            Request::DeleteName(_) => "delete_name",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Request::SetName(req) => &req.name,
            Request::BuyName(req) => &req.name,
            Request::DeleteName(req) => &req.name,
        }
    }

    /// Identity that must have authorized this request.
    pub fn signer(&self) -> &Address {
        match self {
            Request::SetName(req) => &req.owner,
            Request::BuyName(req) => &req.buyer,
            Request::DeleteName(req) => &req.owner,
        }
    }

    pub fn signers(&self) -> Vec<Address> {
        vec![*self.signer()]
    }

    pub fn validate_basic(&self) -> Result<()> {
        match self {
            Request::SetName(req) => req.validate_basic(),
            Request::BuyName(req) => req.validate_basic(),
            Request::DeleteName(req) => req.validate_basic(),
        }
    }
}

impl From<SetValueRequest> for Request {
    fn from(req: SetValueRequest) -> Self {
        Request::SetName(req)
    }
}

impl From<BuyRequest> for Request {
    fn from(req: BuyRequest) -> Self {
        Request::BuyName(req)
    }
}

impl From<ReleaseRequest> for Request {
    fn from(req: ReleaseRequest) -> Self {
        Request::DeleteName(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn someone() -> Address {
        Address::new([5u8; 32])
    }

    fn assert_invalid(result: Result<()>) {
        assert!(matches!(result, Err(RegistryError::InvalidRequest(_))));
    }

    #[test]
    fn empty_signer_rejected() {
        assert_invalid(SetValueRequest::new("a.id", "v", Address::EMPTY).validate_basic());
        assert_invalid(
            BuyRequest::new("a.id", "2token".parse().unwrap(), Address::EMPTY).validate_basic(),
        );
        assert_invalid(ReleaseRequest::new("a.id", Address::EMPTY).validate_basic());
    }

    #[test]
    fn empty_name_or_value_rejected() {
        assert_invalid(SetValueRequest::new("", "v", someone()).validate_basic());
        assert_invalid(SetValueRequest::new("a.id", "", someone()).validate_basic());
        assert_invalid(
            BuyRequest::new("", "2token".parse().unwrap(), someone()).validate_basic(),
        );
        assert_invalid(ReleaseRequest::new("", someone()).validate_basic());
    }

    #[test]
    fn non_positive_bid_rejected() {
        assert_invalid(BuyRequest::new("a.id", Coins::empty(), someone()).validate_basic());
        assert_invalid(
            BuyRequest::new("a.id", "0token".parse().unwrap(), someone()).validate_basic(),
        );
        assert!(BuyRequest::new("a.id", "1token".parse().unwrap(), someone())
            .validate_basic()
            .is_ok());
    }

    #[test]
    fn request_metadata() {
        let req: Request = ReleaseRequest::new("a.id", someone()).into();
        assert_eq!(req.route(), ROUTER_KEY);
        assert_eq!(req.kind(), "delete_name");
        assert_eq!(req.name(), "a.id");
        assert_eq!(req.signers(), vec![someone()]);
    }

    #[test]
    fn requests_decode_from_tagged_json() {
        let json = format!(
            r#"{{"type":"buy_name","name":"alice.id","bid":[{{"denom":"token","amount":2}}],"buyer":"{}"}}"#,
            someone()
        );
        let req: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(
            req,
            Request::BuyName(BuyRequest::new(
                "alice.id",
                "2token".parse().unwrap(),
                someone()
            ))
        );
        assert_eq!(req.kind(), "buy_name");
    }
}
