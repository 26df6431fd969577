use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Client name must not be empty")]
    EmptyName,
    #[error("Client tax id must not be empty")]
    EmptyTaxId,
    #[error("Client tax id must be exactly 11 numeric digits, got `{tax_id}`")]
    MalformedTaxId { tax_id: String },
}

/// Derived identifier, a pure function of the tax id (`CLI-<tax_id>`).
/// Two registrations with the same tax id collide by construction, which is
/// how the bank detects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    fn from_tax_id(tax_id: &str) -> Self {
        Self(format!("CLI-{tax_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    client_id: ClientId,
    full_name: String,
    tax_id: String,
    address: Address,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Flat snapshot handed to persistence and reporting collaborators.
/// Timestamps are RFC 3339 strings, the address its canonical line.
#[derive(Debug, Clone, Serialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub full_name: String,
    pub tax_id: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Client {
    /// Only constructor; the id is derived from the tax id, never supplied.
    pub fn register(
        full_name: &str,
        tax_id: &str,
        address: Address,
        now: DateTime<Utc>,
    ) -> Result<Self, ClientError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(ClientError::EmptyName);
        }
        let tax_id = tax_id.trim();
        if tax_id.is_empty() {
            return Err(ClientError::EmptyTaxId);
        }
        if tax_id.len() != 11 || !tax_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClientError::MalformedTaxId {
                tax_id: tax_id.to_owned(),
            });
        }
        Ok(Self {
            client_id: ClientId::from_tax_id(tax_id),
            full_name: full_name.to_owned(),
            tax_id: tax_id.to_owned(),
            address,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The only mutation a client supports after registration.
    pub fn update_address(&mut self, new_address: Address, now: DateTime<Utc>) {
        self.address = new_address;
        self.updated_at = now;
    }

    pub fn to_record(&self) -> ClientRecord {
        ClientRecord {
            client_id: self.client_id.to_string(),
            full_name: self.full_name.clone(),
            tax_id: self.tax_id.clone(),
            address: self.address.to_string(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.client_id == other.client_id
    }
}

impl Eq for Client {}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::address::AddressDto;

    use super::*;

    fn test_address() -> Address {
        Address::new(AddressDto {
            street: "Rua das Flores".into(),
            number: "123".into(),
            district: "Centro".into(),
            city: "Monte Carmelo".into(),
            state: "MG".into(),
            postal_code: "38500-000".into(),
            complement: None,
        })
        .unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn id_is_derived_from_tax_id() {
        let client = Client::register("Ana", "11122233344", test_address(), fixed_now()).unwrap();
        assert_eq!(client.client_id().as_str(), "CLI-11122233344");
        assert_eq!(client.created_at(), client.updated_at());
    }

    #[test]
    fn name_and_tax_id_are_trimmed() {
        let client =
            Client::register("  Ana Souza  ", " 11122233344 ", test_address(), fixed_now())
                .unwrap();
        assert_eq!(client.full_name(), "Ana Souza");
        assert_eq!(client.tax_id(), "11122233344");
    }

    #[test]
    fn rejects_blank_name_and_tax_id() {
        let err = Client::register("   ", "11122233344", test_address(), fixed_now()).unwrap_err();
        assert_eq!(err, ClientError::EmptyName);
        let err = Client::register("Ana", "  ", test_address(), fixed_now()).unwrap_err();
        assert_eq!(err, ClientError::EmptyTaxId);
    }

    #[test]
    fn rejects_malformed_tax_id() {
        for bad in ["123", "1112223334X", "111222333445"] {
            let err = Client::register("Ana", bad, test_address(), fixed_now()).unwrap_err();
            assert!(matches!(err, ClientError::MalformedTaxId { .. }));
        }
    }

    #[test]
    fn update_address_refreshes_updated_at() {
        let mut client =
            Client::register("Ana", "11122233344", test_address(), fixed_now()).unwrap();
        let later = fixed_now() + chrono::Duration::hours(1);
        let new_address = Address::new(AddressDto {
            street: "Avenida Brasil".into(),
            number: "500".into(),
            district: "Jardim".into(),
            city: "Uberaba".into(),
            state: "MG".into(),
            postal_code: "38000-000".into(),
            complement: None,
        })
        .unwrap();
        client.update_address(new_address, later);
        assert_eq!(client.address().street(), "Avenida Brasil");
        assert_eq!(client.created_at(), fixed_now());
        assert_eq!(client.updated_at(), later);
    }

    #[test]
    fn record_snapshot_uses_rfc3339_and_canonical_address() {
        let client = Client::register("Ana", "11122233344", test_address(), fixed_now()).unwrap();
        let record = client.to_record();
        assert_eq!(record.client_id, "CLI-11122233344");
        assert_eq!(record.created_at, "2024-05-01T12:00:00+00:00");
        assert_eq!(
            record.address,
            "Rua das Flores, 123 - Centro, Monte Carmelo/MG, CEP: 38500-000"
        );
    }
}
