use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidSid {
        field: &'static str,
        expected_prefix: &'static str,
    },
    InvalidPhoneNumber {
        input: String,
    },
    InvalidCountryCode {
        input: String,
    },
    UnknownLookupMethod {
        input: String,
    },
    InvalidUrl {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidSid {
                field,
                expected_prefix,
            } => write!(f, "{field} must start with {expected_prefix}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidCountryCode { input } => write!(f, "invalid country code: {input}"),
            Self::UnknownLookupMethod { input } => {
                write!(
                    f,
                    "unknown lookup method: {input} (expected v2-line-type, v2-basic or v1-carrier)"
                )
            }
            Self::InvalidUrl { input } => write!(f, "invalid base url: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "number" };
        assert_eq!(err.to_string(), "number must not be empty");

        let err = ValidationError::InvalidSid {
            field: "account_sid",
            expected_prefix: "AC",
        };
        assert_eq!(err.to_string(), "account_sid must start with AC");

        let err = ValidationError::InvalidCountryCode {
            input: "XX".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid country code: XX");

        let err = ValidationError::UnknownLookupMethod {
            input: "v3".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "unknown lookup method: v3 (expected v2-line-type, v2-basic or v1-carrier)"
        );
    }
}
