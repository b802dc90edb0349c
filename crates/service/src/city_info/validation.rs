use models::point_of_interest::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN};

use crate::errors::ValidationErrors;

pub const NAME_FIELD: &str = "name";
pub const DESCRIPTION_FIELD: &str = "description";

pub const NAME_REQUIRED: &str = "You should provide a name value.";
pub const DESCRIPTION_EQUALS_NAME: &str = "The provided description should be different from the name.";

/// Shape and business rules shared by create, replace and patch.
pub fn validate_point_fields(name: &str, description: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if name.trim().is_empty() {
        errors.add(NAME_FIELD, NAME_REQUIRED);
    } else if name.chars().count() > NAME_MAX_LEN {
        errors.add(NAME_FIELD, format!("The name may not be longer than {NAME_MAX_LEN} characters."));
    }

    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            errors.add(
                DESCRIPTION_FIELD,
                format!("The description may not be longer than {DESCRIPTION_MAX_LEN} characters."),
            );
        }
        if description == name {
            errors.add(DESCRIPTION_FIELD, DESCRIPTION_EQUALS_NAME);
        }
    }

    errors.into_result()
}
