//! Field checks for customer payloads.

use std::sync::LazyLock;

use regex::Regex;

use super::models::{CustomerPayload, NewCustomer};
use crate::error::{FieldError, ServiceError};

/// The 50 states plus DC.
pub const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid regex")
});

static ZIPCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("Invalid regex"));

/// Check every field of a customer payload and build the typed record.
///
/// A blank `address2` is treated as absent.
pub fn validate_customer(payload: &CustomerPayload) -> Result<NewCustomer, ServiceError> {
    let mut errors = Vec::new();

    let user_id = required(&payload.user_id, "userId", "userId is mandatory", &mut errors)
        .filter(|user_id| {
            let valid = EMAIL_RE.is_match(user_id);
            if !valid {
                errors.push(FieldError::new("userId", "userId must be a valid email address"));
            }
            valid
        });
    let name = required(&payload.name, "name", "Name is mandatory", &mut errors);
    let phone = required(&payload.phone, "phone", "Phone is mandatory", &mut errors);
    let address = required(&payload.address, "address", "Address is mandatory", &mut errors);
    let city = required(&payload.city, "city", "City is mandatory", &mut errors);
    let state = required(&payload.state, "state", "State is mandatory", &mut errors).filter(
        |state| {
            let valid = US_STATE_CODES.contains(&state.as_str());
            if !valid {
                errors.push(FieldError::new(
                    "state",
                    "State must be a valid 2-letter US state code",
                ));
            }
            valid
        },
    );
    let zipcode = required(&payload.zipcode, "zipcode", "Zipcode is mandatory", &mut errors)
        .filter(|zipcode| {
            let valid = ZIPCODE_RE.is_match(zipcode);
            if !valid {
                errors.push(FieldError::new(
                    "zipcode",
                    "Zipcode must be 5 digits or 5+4 digits (NNNNN or NNNNN-NNNN)",
                ));
            }
            valid
        });
    let address2 = payload
        .address2
        .clone()
        .filter(|address2| !address2.trim().is_empty());

    match (user_id, name, phone, address, city, state, zipcode) {
        (
            Some(user_id),
            Some(name),
            Some(phone),
            Some(address),
            Some(city),
            Some(state),
            Some(zipcode),
        ) if errors.is_empty() => Ok(NewCustomer {
            user_id,
            name,
            phone,
            address,
            address2,
            city,
            state,
            zipcode,
        }),
        _ => Err(ServiceError::Validation(errors)),
    }
}

fn required(
    value: &Option<String>,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.clone()),
        _ => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CustomerPayload {
        CustomerPayload {
            user_id: Some("ada@example.com".into()),
            name: Some("Ada Lovelace".into()),
            phone: Some("+14125551234".into()),
            address: Some("5000 Forbes Ave".into()),
            address2: Some("Apt 2".into()),
            city: Some("Pittsburgh".into()),
            state: Some("PA".into()),
            zipcode: Some("15213".into()),
        }
    }

    fn fields(err: ServiceError) -> Vec<String> {
        match err {
            ServiceError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_payload_builds_customer() {
        let customer = validate_customer(&payload()).unwrap();

        assert_eq!(customer.user_id, "ada@example.com");
        assert_eq!(customer.address2.as_deref(), Some("Apt 2"));
    }

    #[test]
    fn address2_is_optional() {
        let missing = validate_customer(&CustomerPayload {
            address2: None,
            ..payload()
        })
        .unwrap();
        let blank = validate_customer(&CustomerPayload {
            address2: Some("  ".into()),
            ..payload()
        })
        .unwrap();

        assert_eq!(missing.address2, None);
        assert_eq!(blank.address2, None);
    }

    #[test]
    fn every_missing_field_is_reported() {
        let err = validate_customer(&CustomerPayload::default()).unwrap_err();

        assert_eq!(
            fields(err),
            vec!["userId", "name", "phone", "address", "city", "state", "zipcode"]
        );
    }

    #[test]
    fn malformed_state_is_rejected() {
        for state in ["ZZ", "pa", "Penn", "P"] {
            let err = validate_customer(&CustomerPayload {
                state: Some(state.into()),
                ..payload()
            })
            .unwrap_err();
            assert_eq!(fields(err), vec!["state"], "state {state}");
        }
    }

    #[test]
    fn every_state_code_is_accepted() {
        assert_eq!(US_STATE_CODES.len(), 51);
        for state in US_STATE_CODES {
            let customer = validate_customer(&CustomerPayload {
                state: Some(state.into()),
                ..payload()
            });
            assert!(customer.is_ok(), "state {state}");
        }
    }

    #[test]
    fn zipcode_must_be_five_or_nine_digits() {
        for zipcode in ["15213", "15213-3890"] {
            assert!(validate_customer(&CustomerPayload {
                zipcode: Some(zipcode.into()),
                ..payload()
            })
            .is_ok());
        }

        for zipcode in ["123", "152133890", "15213-38", "ABCDE", "15213 "] {
            let err = validate_customer(&CustomerPayload {
                zipcode: Some(zipcode.into()),
                ..payload()
            })
            .unwrap_err();
            assert_eq!(fields(err), vec!["zipcode"], "zipcode {zipcode}");
        }
    }

    #[test]
    fn user_id_must_look_like_an_email() {
        for user_id in ["ada", "ada@", "@example.com", "ada@example", "ada example@x.com"] {
            let err = validate_customer(&CustomerPayload {
                user_id: Some(user_id.into()),
                ..payload()
            })
            .unwrap_err();
            assert_eq!(fields(err), vec!["userId"], "userId {user_id}");
        }
    }
}
