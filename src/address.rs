use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address field `{field}` must not be empty")]
    EmptyField { field: &'static str },
}

/// Raw address fields as received across the contract boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressDto {
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub complement: Option<String>,
}

/// Validated postal address. Immutable once constructed; clients replace it
/// wholesale rather than mutating fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    street: String,
    number: String,
    district: String,
    city: String,
    state: String,
    postal_code: String,
    complement: Option<String>,
}

fn required(field: &'static str, value: &str) -> Result<String, AddressError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddressError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

impl Address {
    pub fn new(dto: AddressDto) -> Result<Self, AddressError> {
        // An all-whitespace complement carries no information, drop it.
        let complement = dto
            .complement
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        Ok(Self {
            street: required("street", &dto.street)?,
            number: required("number", &dto.number)?,
            district: required("district", &dto.district)?,
            city: required("city", &dto.city)?,
            state: required("state", &dto.state)?,
            postal_code: required("postal_code", &dto.postal_code)?,
            complement,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn complement(&self) -> Option<&str> {
        self.complement.as_deref()
    }
}

impl fmt::Display for Address {
    /// Canonical single-line rendering, e.g.
    /// `Rua das Flores, 123 - Centro, Monte Carmelo/MG, CEP: 38500-000 (Apto 45)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} - {}, {}/{}, CEP: {}",
            self.street, self.number, self.district, self.city, self.state, self.postal_code
        )?;
        if let Some(complement) = &self.complement {
            write!(f, " ({complement})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> AddressDto {
        AddressDto {
            street: "Rua das Flores".into(),
            number: "123".into(),
            district: "Centro".into(),
            city: "Monte Carmelo".into(),
            state: "MG".into(),
            postal_code: "38500-000".into(),
            complement: Some("Apto 45".into()),
        }
    }

    #[test]
    fn canonical_string_with_complement() {
        let addr = Address::new(valid_dto()).unwrap();
        assert_eq!(
            addr.to_string(),
            "Rua das Flores, 123 - Centro, Monte Carmelo/MG, CEP: 38500-000 (Apto 45)"
        );
    }

    #[test]
    fn canonical_string_without_complement() {
        let addr = Address::new(AddressDto {
            complement: None,
            ..valid_dto()
        })
        .unwrap();
        assert_eq!(
            addr.to_string(),
            "Rua das Flores, 123 - Centro, Monte Carmelo/MG, CEP: 38500-000"
        );
    }

    #[test]
    fn fields_are_trimmed() {
        let addr = Address::new(AddressDto {
            street: "  Rua Teste  ".into(),
            number: " 10 ".into(),
            district: " Bairro ".into(),
            city: " Cidade ".into(),
            state: " SP ".into(),
            postal_code: " 00000-000 ".into(),
            complement: Some("   ".into()),
        })
        .unwrap();
        assert_eq!(addr.street(), "Rua Teste");
        assert_eq!(addr.postal_code(), "00000-000");
        // whitespace-only complement is normalized away
        assert_eq!(addr.complement(), None);
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let err = Address::new(AddressDto {
            city: "   ".into(),
            ..valid_dto()
        })
        .unwrap_err();
        assert_eq!(err, AddressError::EmptyField { field: "city" });
    }
}
