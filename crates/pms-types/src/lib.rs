//! Validated text types shared by the patient management crates.
//!
//! Values of these types are trimmed on construction and can never hold text that breaks
//! their rule, so a stored `Patient` cannot carry an empty gender or a one-letter name.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input was shorter than the required number of characters
    #[error("Text must be at least {min} characters")]
    TooShort { min: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A patient's display name: trimmed, at least [`PatientName::MIN_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientName(String);

impl PatientName {
    /// Minimum number of characters after trimming.
    pub const MIN_CHARS: usize = 2;

    /// Creates a new `PatientName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::TooShort` when the trimmed
    /// name has fewer than [`PatientName::MIN_CHARS`] characters.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.chars().count() < Self::MIN_CHARS {
            return Err(TextError::TooShort {
                min: Self::MIN_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_text_traits {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                $ty::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_text_traits!(NonEmptyText);
impl_text_traits!(PatientName);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Diabetes \n").expect("should accept padded text");
        assert_eq!(text.as_str(), "Diabetes");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn test_patient_name_requires_two_characters() {
        assert_eq!(
            PatientName::new(" A "),
            Err(TextError::TooShort { min: 2 })
        );
        assert_eq!(PatientName::new(""), Err(TextError::Empty));
        assert_eq!(
            PatientName::new(" Al ").expect("two characters is enough").as_str(),
            "Al"
        );
    }

    #[test]
    fn test_patient_name_counts_characters_not_bytes() {
        // Two characters, four bytes.
        assert!(PatientName::new("Çé").is_ok());
        assert!(PatientName::new("Ç").is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid_text() {
        let err = serde_json::from_str::<PatientName>("\"x\"");
        assert!(err.is_err(), "single character name should not deserialize");

        let name: PatientName =
            serde_json::from_str("\" Fatima Ali \"").expect("valid name should deserialize");
        assert_eq!(name.as_str(), "Fatima Ali");
        assert_eq!(
            serde_json::to_string(&name).expect("serialize"),
            "\"Fatima Ali\""
        );
    }
}
