/// Parse a key=value pair string into a tuple.
///
/// A leading `.` on the key is dropped so `--map-ext .vue=html` works too.
///
/// # Errors
/// Returns an error if the input has no `=` or either side is empty.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected key=val: {s}"))?;
    let k = k.trim().trim_start_matches('.');
    let v = v.trim();
    if k.is_empty() || v.is_empty() {
        return Err(format!("Expected key=val: {s}"));
    }
    Ok((k.to_string(), v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        let (k, v) = parse_key_val("vue=html").unwrap();
        assert_eq!(k, "vue");
        assert_eq!(v, "html");
        assert_eq!(parse_key_val(".svg = xml").unwrap(), ("svg".into(), "xml".into()));
    }

    #[test]
    fn test_parse_key_val_error() {
        assert!(parse_key_val("no_equals").is_err());
        assert!(parse_key_val("=html").is_err());
        assert!(parse_key_val("vue=").is_err());
    }
}
