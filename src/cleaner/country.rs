use std::collections::HashMap;

/// Title-cases `text`: a letter is uppercased when the previous character is
/// not a letter, otherwise lowercased. `"papua new guinea"` becomes
/// `"Papua New Guinea"` and `"usa"` becomes `"Usa"` (fixed up by aliases).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Normalizes a raw country value. Returns `None` for blank input.
pub fn normalize_country(raw: &str, aliases: &HashMap<String, String>) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let titled = title_case(&collapsed);
    Some(aliases.get(&titled).cloned().unwrap_or(titled))
}
