use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListingError {
    #[error("Invalid sort field: {field}. Valid values: {}", valid_fields.join(", "))]
    InvalidSortField {
        field: String,
        valid_fields: Vec<&'static str>,
    },
}
