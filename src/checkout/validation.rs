//! Shipping-details validation
//!
//! The checkout form is checked against an ordered list of rules and the
//! first rule that fails decides the message shown to the customer. Rules
//! are plain data: a predicate paired with the [`ValidationError`] it
//! raises. The human-readable text lives on the error kind, not in the rule
//! list.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Shipping details entered on the checkout page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingDetails {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pin_code: String,
}

impl ShippingDetails {
    /// `address_line2` with blank values treated as absent.
    pub fn address_line2(&self) -> Option<&str> {
        self.address_line2
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// States and union territories offered by the state picker
pub const INDIAN_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

/// Why a set of shipping details cannot be used yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub enum ValidationError {
    FullNameMissing,
    PhoneMissing,
    PhoneInvalid,
    EmailMissing,
    EmailInvalid,
    AddressMissing,
    CityMissing,
    StateMissing,
    StateInvalid,
    PinCodeMissing,
    PinCodeInvalid,
}

impl ValidationError {
    /// Text shown under the payment options.
    pub fn message(self) -> &'static str {
        match self {
            Self::FullNameMissing => "Please fill Full Name field to enable payment method",
            Self::PhoneMissing => "Please fill Phone Number field to enable payment method",
            Self::PhoneInvalid => "Please enter a valid 10-digit Phone Number",
            Self::EmailMissing => "Please fill Email Address field to enable payment method",
            Self::EmailInvalid => "Please enter a valid Email Address",
            Self::AddressMissing => "Please fill Address Line 1 field to enable payment method",
            Self::CityMissing => "Please fill City field to enable payment method",
            Self::StateMissing => "Please fill State field to enable payment method",
            Self::StateInvalid => "Please select a valid State",
            Self::PinCodeMissing => "Please fill PIN Code field to enable payment method",
            Self::PinCodeInvalid => "Please enter a valid 6-digit PIN Code",
        }
    }

    /// The form field the error points at, in wire naming.
    pub fn field(self) -> &'static str {
        match self {
            Self::FullNameMissing => "fullName",
            Self::PhoneMissing | Self::PhoneInvalid => "phone",
            Self::EmailMissing | Self::EmailInvalid => "email",
            Self::AddressMissing => "addressLine1",
            Self::CityMissing => "city",
            Self::StateMissing | Self::StateInvalid => "state",
            Self::PinCodeMissing | Self::PinCodeInvalid => "pinCode",
        }
    }
}

type Rule = (fn(&ShippingDetails) -> bool, ValidationError);

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Evaluated top to bottom; the first predicate returning `false` wins.
static RULES: &[Rule] = &[
    (|d| filled(&d.full_name), ValidationError::FullNameMissing),
    (|d| filled(&d.phone), ValidationError::PhoneMissing),
    (|d| PHONE_RE.is_match(&d.phone), ValidationError::PhoneInvalid),
    (|d| filled(&d.email), ValidationError::EmailMissing),
    (|d| EMAIL_RE.is_match(&d.email), ValidationError::EmailInvalid),
    (|d| filled(&d.address_line1), ValidationError::AddressMissing),
    (|d| filled(&d.city), ValidationError::CityMissing),
    (|d| filled(&d.state), ValidationError::StateMissing),
    (|d| INDIAN_STATES.contains(&d.state.as_str()), ValidationError::StateInvalid),
    (|d| filled(&d.pin_code), ValidationError::PinCodeMissing),
    (|d| PIN_RE.is_match(&d.pin_code), ValidationError::PinCodeInvalid),
];

/// Checks `details` and reports the first problem found.
pub fn validate(details: &ShippingDetails) -> Result<(), ValidationError> {
    match RULES.iter().find(|(passes, _)| !passes(details)) {
        Some((_, error)) => Err(*error),
        None => Ok(()),
    }
}
