use crate::error::ValidationError;
use crate::models::FormattedChargeRequest;
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidateEmail;

static CARD_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{13,19}$").unwrap());
static CVV: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").unwrap());
static EXPIRY_MMYY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])[0-9]{2}$").unwrap());
static CPF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{11}$").unwrap());

/// Checks a charge request before it is sent to the gateway.
///
/// Rules run in a fixed order and the first one broken is reported.
pub fn validate(request: &FormattedChargeRequest) -> Result<(), ValidationError> {
    check_required(request)?;

    if !CARD_NUMBER.is_match(&request.card_number) {
        return Err(ValidationError::InvalidCardNumber);
    }
    if !CVV.is_match(&request.card_cvv) {
        return Err(ValidationError::InvalidCvv);
    }
    if !EXPIRY_MMYY.is_match(&request.card_expiration_date) {
        return Err(ValidationError::InvalidExpiry);
    }

    let Some(customer) = request.customer.as_ref() else {
        return Err(ValidationError::MissingField("customer"));
    };
    if !customer.email.validate_email() {
        return Err(ValidationError::InvalidEmail);
    }

    let cpf = customer.documents.first().map(|doc| doc.number.as_str()).unwrap_or_default();
    if !CPF.is_match(cpf) {
        return Err(ValidationError::InvalidCpf);
    }

    Ok(())
}

fn check_required(request: &FormattedChargeRequest) -> Result<(), ValidationError> {
    let present = [
        ("external_order_id", request.external_order_id != 0),
        ("amount", request.amount != 0.0),
        ("card_number", !request.card_number.is_empty()),
        ("card_cvv", !request.card_cvv.is_empty()),
        ("card_expiration_date", !request.card_expiration_date.is_empty()),
        ("card_holder_name", !request.card_holder_name.is_empty()),
        ("customer", request.customer.is_some()),
    ];

    match present.iter().find(|(_, ok)| !ok) {
        Some((field, _)) => Err(ValidationError::MissingField(*field)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChargeCustomer, ChargeDocument};

    fn valid_request() -> FormattedChargeRequest {
        FormattedChargeRequest {
            external_order_id: 1,
            amount: 100.0,
            card_number: "4111111111111111".to_string(),
            card_cvv: "123".to_string(),
            card_expiration_date: "0525".to_string(),
            card_holder_name: "Teste Junior".to_string(),
            customer: Some(ChargeCustomer {
                external_id: "1".to_string(),
                name: "Cliente Teste".to_string(),
                kind: "individual".to_string(),
                email: "teste@exemplo.com".to_string(),
                documents: vec![ChargeDocument::cpf("12345678901")],
                birthday: "2000-01-01".to_string(),
            }),
        }
    }

    #[test]
    fn test_valid_request() {
        assert_eq!(validate(&valid_request()), Ok(()));
    }

    #[test]
    fn test_missing_fields_are_named() {
        let cases: [(&'static str, fn(&mut FormattedChargeRequest)); 7] = [
            ("external_order_id", |r| r.external_order_id = 0),
            ("amount", |r| r.amount = 0.0),
            ("card_number", |r| r.card_number.clear()),
            ("card_cvv", |r| r.card_cvv.clear()),
            ("card_expiration_date", |r| r.card_expiration_date.clear()),
            ("card_holder_name", |r| r.card_holder_name.clear()),
            ("customer", |r| r.customer = None),
        ];

        for (field, blank) in cases {
            let mut request = valid_request();
            blank(&mut request);
            assert_eq!(
                validate(&request),
                Err(ValidationError::MissingField(field)),
                "field {field}"
            );
        }
    }

    #[test]
    fn test_required_fields_checked_in_order() {
        let mut request = valid_request();
        request.card_cvv.clear();
        request.card_holder_name.clear();
        request.customer = None;
        assert_eq!(validate(&request), Err(ValidationError::MissingField("card_cvv")));
    }

    #[test]
    fn test_first_failure_wins() {
        let mut request = valid_request();
        request.card_number = "123".to_string();
        request.card_cvv = "1".to_string();
        assert_eq!(validate(&request), Err(ValidationError::InvalidCardNumber));
    }

    #[test]
    fn test_short_card_number() {
        let mut request = valid_request();
        request.card_number = "123".to_string();
        assert_eq!(validate(&request), Err(ValidationError::InvalidCardNumber));
    }

    #[test]
    fn test_cvv_length() {
        for cvv in ["12", "12345", "12a"] {
            let mut request = valid_request();
            request.card_cvv = cvv.to_string();
            assert_eq!(validate(&request), Err(ValidationError::InvalidCvv), "cvv {cvv}");
        }
        let mut request = valid_request();
        request.card_cvv = "1234".to_string();
        assert_eq!(validate(&request), Ok(()));
    }

    #[test]
    fn test_expiry_month_range() {
        for expiry in ["1325", "0025", "052", "05/25"] {
            let mut request = valid_request();
            request.card_expiration_date = expiry.to_string();
            assert_eq!(validate(&request), Err(ValidationError::InvalidExpiry), "expiry {expiry}");
        }
    }

    #[test]
    fn test_invalid_email() {
        let mut request = valid_request();
        request.customer.as_mut().unwrap().email = "email_invalido".to_string();
        assert_eq!(validate(&request), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_invalid_cpf() {
        let mut request = valid_request();
        request.customer.as_mut().unwrap().documents = vec![ChargeDocument::cpf("123")];
        assert_eq!(validate(&request), Err(ValidationError::InvalidCpf));

        request.customer.as_mut().unwrap().documents.clear();
        assert_eq!(validate(&request), Err(ValidationError::InvalidCpf));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField("card_cvv").to_string(),
            "Campo obrigatório ausente: card_cvv"
        );
        assert_eq!(ValidationError::InvalidCpf.to_string(), "CPF do cliente inválido");
    }
}
