use crate::utils::error::{CheckError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Target hosts are a scheme plus a hostname; ports are configured separately.
pub fn validate_host(field_name: &str, host: &str) -> Result<()> {
    let invalid = |reason: String| CheckError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: host.to_string(),
        reason,
    };

    if host.is_empty() {
        return Err(invalid("Host cannot be empty".to_string()));
    }

    let url = Url::parse(host).map_err(|e| invalid(format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("Unsupported URL scheme: {}", scheme))),
    }

    if url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }
    if url.port().is_some() {
        return Err(invalid(
            "Port belongs in content_port / error_port, not in the host".to_string(),
        ));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("Host must not carry a path or query".to_string()));
    }

    Ok(())
}

pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: port.to_string(),
            reason: "Port must be between 1 and 65535".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
