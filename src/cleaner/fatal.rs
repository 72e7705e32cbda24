use crate::records::Fatality;

/// Maps the many spellings of the fatality flag onto [`Fatality`].
/// `UNKNOWN`, `N/A` and anything unrecognized yield `None`.
pub fn normalize_fatal(raw: &str) -> Option<Fatality> {
    match raw.trim().to_uppercase().as_str() {
        "Y" | "YES" | "F" | "FATAL" => Some(Fatality::Fatal),
        "N" | "NO" | "NON-FATAL" | "NON FATAL" | "NONFATAL" => Some(Fatality::NonFatal),
        _ => None,
    }
}
