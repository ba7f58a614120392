//! Utility functions for the product search repository.

use product_search_shared::ProductDocument;

use crate::errors::ProductSearchError;

/// Validate a product id taken from a request path.
///
/// The id is returned unchanged, matching how `ProductDocument::document_id`
/// keys writes, so a product saved as `"2001 "` is read back under the same id.
///
/// # Returns
///
/// * `Ok(&str)` - The id as given
/// * `Err(ProductSearchError)` - If the id is blank
///
/// # Example
///
/// ```
/// use product_search_repository::require_product_id;
///
/// assert_eq!(require_product_id(" 1001 ").unwrap(), " 1001 ");
/// assert!(require_product_id("   ").is_err());
/// ```
pub fn require_product_id(product_id: &str) -> Result<&str, ProductSearchError> {
    if product_id.trim().is_empty() {
        return Err(ProductSearchError::validation("product_id is required"));
    }
    Ok(product_id)
}

/// Validate that a product carries the fields every write needs.
///
/// Both `id` and `productName` must be present and not blank.
pub fn validate_product(product: &ProductDocument) -> Result<(), ProductSearchError> {
    if !product.has_required_fields() {
        return Err(ProductSearchError::validation(format!(
            "Product id and productName are required (product id: {})",
            product.id.as_deref().unwrap_or("<missing>")
        )));
    }
    Ok(())
}
