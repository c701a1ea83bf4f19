pub mod cart;
pub mod checkout;
pub mod settings;

use validator::ValidationErrors;

/// Map a `validator` error set to a single human-readable message.
///
/// The error map is unordered, so the caller supplies the declared field
/// order; the first field in that order with an error wins. This keeps the
/// "first invalid field" reported to clients deterministic.
pub(crate) fn first_validation_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let map = errors.field_errors();
    for field in field_order {
        if let Some(error) = map.get(field).and_then(|list| list.first()) {
            return match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            };
        }
    }
    "Invalid request.".to_string()
}
