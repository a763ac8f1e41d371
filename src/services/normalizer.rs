/// Canonical form of a title for exact matching
///
/// Lowercases, then keeps only ASCII letters and digits, so `"The Matrix!"`
/// and `"the  matrix"` both become `"thematrix"`.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();

    stripped.trim().to_string()
}
