/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::*;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

/// Repository names as the provider accepts them.
pub fn check_repo_name(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if s.len() > 100 {
        return Err("Name cannot exceed 100 characters".to_string());
    }

    if s.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.') {
        return Err("Name can only contain letters, numbers, dashes, underscores, and periods"
            .to_string());
    }

    if s.starts_with('.') || s.starts_with('-') || s.ends_with('.') || s.ends_with('-') {
        return Err("Name can only start and end with letters, numbers, or underscores".to_string());
    }

    Ok(())
}

/// Lowercase index names for catalog entities (stacks, technologies,
/// link groups).
pub fn check_index_name(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if s != s.to_lowercase() {
        return Err("Name must be lowercase".to_string());
    }

    if s.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-') {
        return Err("Name can only contain letters, numbers, and dashes".to_string());
    }

    if s.starts_with('-') || s.ends_with('-') {
        return Err("Name can only start and end with letters or numbers".to_string());
    }

    Ok(())
}

pub fn validate_display_name(s: &str) -> Result<(), String> {
    if s.trim().is_empty() {
        return Err("Display name cannot be empty".to_string());
    }

    if s.len() > 64 {
        return Err("Display name cannot exceed 64 characters".to_string());
    }

    if s.contains(|c: char| c.is_control()) {
        return Err("Display name cannot contain control characters".to_string());
    }

    Ok(())
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_repo_name() {
        assert!(check_repo_name("demo").is_ok());
        assert!(check_repo_name("my-repo_v2.1").is_ok());
        assert!(check_repo_name("").is_err());
        assert!(check_repo_name(".hidden").is_err());
        assert!(check_repo_name("trailing-").is_err());
        assert!(check_repo_name("spaces in name").is_err());
    }

    #[test]
    fn test_check_index_name() {
        assert!(check_index_name("frontend").is_ok());
        assert!(check_index_name("react-native").is_ok());
        assert!(check_index_name("Frontend").is_err());
        assert!(check_index_name("-leading").is_err());
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("My Portfolio").is_ok());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"x".repeat(65)).is_err());
    }
}
