//! Strongly typed directory identifiers (tenant, client, application, object).

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
// Identifiers are spliced into URL paths and OData key segments.
const RESERVED_CHARS: &[char] = &['/', '?', '#', '%', '\'', '&'];

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (tenant, client, application, object).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains a character that would corrupt a request URL.
	#[error("{kind} identifier contains the reserved character {ch:?}.")]
	ReservedCharacter {
		/// Kind of identifier.
		kind: &'static str,
		/// Offending character.
		ch: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { TenantId, "Directory (tenant) identifier or verified domain.", "Tenant" }
def_id! { ClientId, "Client (application) identifier of the deploying principal.", "Client" }
def_id! { ApplicationId, "Application (`appId`) identifier of a registration.", "Application" }
def_id! { ObjectId, "Directory object (`id`) identifier of a registration.", "Object" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(ch) = view.chars().find(|ch| RESERVED_CHARS.contains(ch)) {
		return Err(IdentifierError::ReservedCharacter { kind, ch });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty() {
		assert!(TenantId::new(" contoso.onmicrosoft.com").is_err());
		assert!(ClientId::new("").is_err());

		let tenant = TenantId::new("contoso.onmicrosoft.com")
			.expect("Domain-style tenant identifiers should be accepted.");

		assert_eq!(tenant.as_ref(), "contoso.onmicrosoft.com");
	}

	#[test]
	fn identifiers_reject_url_breaking_characters() {
		assert_eq!(
			ObjectId::new("abc/../def"),
			Err(IdentifierError::ReservedCharacter { kind: "Object", ch: '/' })
		);
		assert!(ApplicationId::new("x')?$select=id").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let app: ApplicationId =
			serde_json::from_str("\"3f2504e0-4f89-11d3-9a0c-0305e82c3301\"")
				.expect("Application identifier should deserialize successfully.");

		assert_eq!(app.as_ref(), "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
		assert!(serde_json::from_str::<ApplicationId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		TenantId::new(&exact).expect("Exact length should succeed.");

		assert!(TenantId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}
}
