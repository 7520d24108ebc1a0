//! Checkout contact details and their validation.
//!
//! [`CustomerForm`] is raw input. The only way to obtain a [`CustomerInfo`]
//! (and so the only way to reach the order ledger) is
//! [`CustomerForm::validate`].

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Indian mobile number: ten ASCII digits, leading 6-9.
static PHONE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone pattern"));

/// Six ASCII digits.
static PINCODE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("pincode pattern"));

// ─── Input ───────────────────────────────────────────────────────────────────

/// Unvalidated checkout form.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
  pub name:    String,
  pub email:   String,
  pub phone:   String,
  pub address: String,
  pub city:    String,
  pub state:   String,
  pub pincode: String,
}

/// A form field, used to key [`ValidationErrors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
  Name,
  Email,
  Phone,
  Address,
  City,
  State,
  Pincode,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Name => "name",
      Self::Email => "email",
      Self::Phone => "phone",
      Self::Address => "address",
      Self::City => "city",
      Self::State => "state",
      Self::Pincode => "pincode",
    })
  }
}

/// Every field that failed validation, with a user-facing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
  pub fn get(&self, field: Field) -> Option<&'static str> { self.0.get(&field).copied() }

  pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
    self.0.iter().map(|(f, m)| (*f, *m))
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

// ─── Validated output ────────────────────────────────────────────────────────

/// Where the order ships. Stored verbatim on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
  pub address: String,
  pub city:    String,
  pub state:   String,
  pub pincode: String,
}

/// Contact details that passed [`CustomerForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
  name:    String,
  email:   String,
  phone:   String,
  address: ShippingAddress,
}

impl CustomerInfo {
  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> &str { &self.email }

  /// The ten normalised digits.
  pub fn phone(&self) -> &str { &self.phone }

  pub fn address(&self) -> &ShippingAddress { &self.address }

  pub(crate) fn into_parts(self) -> (String, String, String, ShippingAddress) {
    (self.name, self.email, self.phone, self.address)
  }
}

impl CustomerForm {
  /// Check every field, reporting all failures at once.
  pub fn validate(self) -> Result<CustomerInfo, ValidationErrors> {
    let mut errors = BTreeMap::new();

    let name = self.name.trim();
    if name.is_empty() {
      errors.insert(Field::Name, "Name is required");
    }

    let email = self.email.trim();
    if email.is_empty() {
      errors.insert(Field::Email, "Email is required");
    } else if !EMAIL.is_match(email) {
      errors.insert(Field::Email, "Invalid email format");
    }

    let phone: String =
      self.phone.chars().filter(char::is_ascii_digit).collect();
    if self.phone.trim().is_empty() {
      errors.insert(Field::Phone, "Phone number is required");
    } else if !PHONE.is_match(&phone) {
      errors.insert(Field::Phone, "Invalid phone number");
    }

    for (field, value, message) in [
      (Field::Address, &self.address, "Address is required"),
      (Field::City, &self.city, "City is required"),
      (Field::State, &self.state, "State is required"),
    ] {
      if value.trim().is_empty() {
        errors.insert(field, message);
      }
    }

    let pincode = self.pincode.trim();
    if pincode.is_empty() {
      errors.insert(Field::Pincode, "Pincode is required");
    } else if !PINCODE.is_match(pincode) {
      errors.insert(Field::Pincode, "Pincode must be 6 digits");
    }

    if !errors.is_empty() {
      return Err(ValidationErrors(errors));
    }

    Ok(CustomerInfo {
      name: name.to_owned(),
      email: email.to_owned(),
      phone,
      address: ShippingAddress {
        address: self.address.trim().to_owned(),
        city:    self.city.trim().to_owned(),
        state:   self.state.trim().to_owned(),
        pincode: pincode.to_owned(),
      },
    })
  }
}
