use crate::utils::error::{RelayError, Result};
use url::Url;

/// Marketplace item ids are fixed-width decimal tokens.
pub const ITEM_ID_LEN: usize = 12;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Returns true when `raw` (after trimming) is a well-formed item id.
pub fn is_valid_item_id(raw: &str) -> bool {
    let candidate = raw.trim();
    candidate.len() == ITEM_ID_LEN && candidate.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// An item base URL is joined with bare ids, so it must be http(s), end
/// with `/` and carry no query or fragment that the join would drop.
pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    validate_url(field_name, url_str)?;

    let reason = if !url_str.ends_with('/') {
        Some("Base URL must end with '/'")
    } else {
        Url::parse(url_str)
            .ok()
            .filter(|url| url.query().is_some() || url.fragment().is_some())
            .map(|_| "Base URL cannot carry a query or fragment")
    };

    match reason {
        Some(reason) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_selector(field_name: &str, selector: &str) -> Result<()> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: selector.to_string(),
            reason: format!("Invalid CSS selector: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_item_id() {
        assert!(is_valid_item_id("110445512345"));
        assert!(is_valid_item_id("  223300001111 "));

        assert!(!is_valid_item_id(""));
        assert!(!is_valid_item_id("abc"));
        assert!(!is_valid_item_id("11044551234"));
        assert!(!is_valid_item_id("1104455123456"));
        assert!(!is_valid_item_id("11044551234a"));
        assert!(!is_valid_item_id("１１０４４５５１２３４５"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("analytics.endpoint", "https://example.com").is_ok());
        assert!(validate_url("analytics.endpoint", "http://example.com").is_ok());
        assert!(validate_url("analytics.endpoint", "").is_err());
        assert!(validate_url("analytics.endpoint", "invalid-url").is_err());
        assert!(validate_url("analytics.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("marketplace.item_base_url", "https://www.ebay.com/itm/").is_ok());
        assert!(validate_base_url("marketplace.item_base_url", "https://www.ebay.com/itm").is_err());
        assert!(validate_base_url("marketplace.item_base_url", "ftp://www.ebay.com/itm/").is_err());
        assert!(
            validate_base_url("marketplace.item_base_url", "https://www.ebay.com/itm/?ref=/").is_err()
        );
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("marketplace.concurrent_requests", 5, 1).is_ok());
        assert!(validate_positive_number("marketplace.concurrent_requests", 0, 1).is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("marketplace.title_selector", "h1.title span").is_ok());
        assert!(validate_selector("marketplace.title_selector", "h1[[").is_err());
    }
}
