//! Student form validation

use crate::http::FormData;
use crate::store::students::NewStudent;
use serde::Serialize;
use std::collections::BTreeMap;

pub const HOUSES: [&str; 4] = ["Gryffindor", "Hufflepuff", "Ravenclaw", "Slytherin"];

pub const NAME_MAX_CHARS: usize = 100;

/// Raw values of the student form, kept for re-rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentForm {
    pub name: String,
    pub house: String,
}

/// One message per failing field
pub type FieldErrors = BTreeMap<&'static str, String>;

impl StudentForm {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            name: form.get("name").unwrap_or_default().to_string(),
            house: form.get("house").unwrap_or_default().to_string(),
        }
    }

    pub fn validate(&self) -> Result<NewStudent, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Name is required.".to_string());
        } else if name.chars().count() > NAME_MAX_CHARS {
            errors.insert(
                "name",
                format!("Name must be at most {NAME_MAX_CHARS} characters."),
            );
        }

        let house = self.house.trim();
        if house.is_empty() {
            errors.insert("house", "House is required.".to_string());
        } else if !HOUSES.contains(&house) {
            errors.insert("house", format!("House must be one of {}.", HOUSES.join(", ")));
        }

        if errors.is_empty() {
            Ok(NewStudent {
                name: name.to_string(),
                house: house.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form_is_trimmed() {
        let form = StudentForm::from_form(&FormData::parse("name=+Harry+Potter+&house=Gryffindor"));
        let student = form.validate().unwrap();
        assert_eq!(student.name, "Harry Potter");
        assert_eq!(student.house, "Gryffindor");
    }

    #[test]
    fn test_missing_fields() {
        let errors = StudentForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors["name"].contains("required"));
        assert!(errors["house"].contains("required"));
    }

    #[test]
    fn test_unknown_house() {
        let form = StudentForm::from_form(&FormData::parse("name=Harry&house=Durmstrang"));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors["house"].contains("Gryffindor"));
    }

    #[test]
    fn test_name_too_long() {
        let form = StudentForm {
            name: "x".repeat(NAME_MAX_CHARS + 1),
            house: "Ravenclaw".to_string(),
        };
        assert!(form.validate().unwrap_err().contains_key("name"));
    }
}
