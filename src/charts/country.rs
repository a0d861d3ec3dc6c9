/// Returns a human-friendly label for a dataset country code. Codes without
/// a known label fall back to uppercase.
pub fn pretty_country(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return String::new();
    }
    match code.to_lowercase().as_str() {
        "global" => "Global".to_string(),
        "us" => "United States (US)".to_string(),
        "gb" => "United Kingdom (GB)".to_string(),
        "ca" => "Canada (CA)".to_string(),
        "au" => "Australia (AU)".to_string(),
        "de" => "Germany (DE)".to_string(),
        "fr" => "France (FR)".to_string(),
        "br" => "Brazil (BR)".to_string(),
        "mx" => "Mexico (MX)".to_string(),
        "jp" => "Japan (JP)".to_string(),
        "ng" => "Nigeria (NG)".to_string(),
        "fi" => "Finland (FI)".to_string(),
        "ch" => "Switzerland (CH)".to_string(),
        "no" => "Norway (NO)".to_string(),
        "se" => "Sweden (SE)".to_string(),
        "dk" => "Denmark (DK)".to_string(),
        "lu" => "Luxembourg (LU)".to_string(),
        other => other.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::pretty_country;

    #[test]
    fn known_codes_get_labels() {
        assert_eq!(pretty_country("us"), "United States (US)");
        assert_eq!(pretty_country("global"), "Global");
    }

    #[test]
    fn unknown_codes_fall_back_to_uppercase() {
        assert_eq!(pretty_country("it"), "IT");
        assert_eq!(pretty_country(""), "");
    }
}
