//! Named fake value kinds.
//!
//! Definition files cannot hold closures, so they refer to generators by
//! name (`{"faker": "email"}`). [`FakerType`] maps those names onto the
//! `fake` crate and produces JSON values through a [`Generator`].

use std::collections::HashMap;
use std::str::FromStr;

use fake::faker::address::en::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{DomainSuffix, IPv4, Password, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::FactoryError;
use crate::generator::Generator;

/// Kinds of fake data available to definition files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakerType {
	/// Full person name.
	Name,
	/// Given name.
	FirstName,
	/// Family name.
	LastName,
	/// Login name.
	Username,
	/// Email address on a reserved domain.
	Email,
	/// Password of 8 to 16 characters.
	Password,
	/// Domain suffix such as `com`.
	DomainSuffix,
	/// IPv4 address.
	Ipv4,
	/// Single lorem word.
	Word,
	/// Lorem sentence.
	Sentence,
	/// Lorem paragraph.
	Paragraph,
	/// Company name.
	Company,
	/// City name.
	City,
	/// Country name.
	Country,
	/// Street name.
	Street,
	/// Postal code.
	ZipCode,
	/// Phone number.
	Phone,
	/// Boolean with even odds.
	Boolean,
	/// Integer in `0..=1000`.
	Integer,
	/// Float in `0.0..1.0`.
	Float,
}

static FAKER_NAMES: Lazy<HashMap<&'static str, FakerType>> = Lazy::new(|| {
	HashMap::from([
		("name", FakerType::Name),
		("first_name", FakerType::FirstName),
		("last_name", FakerType::LastName),
		("username", FakerType::Username),
		("email", FakerType::Email),
		("safe_email", FakerType::Email),
		("password", FakerType::Password),
		("domain_suffix", FakerType::DomainSuffix),
		("ipv4", FakerType::Ipv4),
		("word", FakerType::Word),
		("sentence", FakerType::Sentence),
		("paragraph", FakerType::Paragraph),
		("text", FakerType::Paragraph),
		("company", FakerType::Company),
		("city", FakerType::City),
		("country", FakerType::Country),
		("street", FakerType::Street),
		("zip_code", FakerType::ZipCode),
		("postcode", FakerType::ZipCode),
		("phone", FakerType::Phone),
		("boolean", FakerType::Boolean),
		("bool", FakerType::Boolean),
		("integer", FakerType::Integer),
		("number", FakerType::Integer),
		("float", FakerType::Float),
	])
});

impl FakerType {
	/// Produces one value of this kind.
	pub fn generate(&self, generator: &Generator) -> Value {
		match self {
			Self::Name => Value::String(generator.fake(Name())),
			Self::FirstName => Value::String(generator.fake(FirstName())),
			Self::LastName => Value::String(generator.fake(LastName())),
			Self::Username => Value::String(generator.fake(Username())),
			Self::Email => Value::String(generator.fake(SafeEmail())),
			Self::Password => Value::String(generator.fake(Password(8..16))),
			Self::DomainSuffix => Value::String(generator.fake(DomainSuffix())),
			Self::Ipv4 => Value::String(generator.fake(IPv4())),
			Self::Word => Value::String(generator.fake(Word())),
			Self::Sentence => Value::String(generator.fake(Sentence(3..8))),
			Self::Paragraph => Value::String(generator.fake(Paragraph(2..4))),
			Self::Company => Value::String(generator.fake(CompanyName())),
			Self::City => Value::String(generator.fake(CityName())),
			Self::Country => Value::String(generator.fake(CountryName())),
			Self::Street => Value::String(generator.fake(StreetName())),
			Self::ZipCode => Value::String(generator.fake(ZipCode())),
			Self::Phone => Value::String(generator.fake(PhoneNumber())),
			Self::Boolean => Value::Bool(generator.chance(0.5)),
			Self::Integer => Value::from(generator.between::<i64, _>(0..=1000)),
			Self::Float => Value::from(generator.between::<f64, _>(0.0..1.0)),
		}
	}
}

impl FromStr for FakerType {
	type Err = FactoryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		FAKER_NAMES
			.get(s.trim().to_lowercase().as_str())
			.copied()
			.ok_or_else(|| FactoryError::FakerError(format!("Unknown faker kind '{}'", s)))
	}
}
