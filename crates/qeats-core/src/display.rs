//! Display-name cleanup for the presentation layer.
//!
//! Some catalog names carry mis-decoded characters. The cleanup is an
//! explicit allow-list substitution; it is never applied by the lookup
//! engine, only by whatever layer shapes responses.

/// Characters known to appear as encoding artifacts in catalog names
pub const NAME_ARTIFACTS: [char; 4] = ['Â', '©', 'é', 'í'];

/// Replacement written in place of each artifact
pub const ARTIFACT_REPLACEMENT: char = 'e';

/// Replace every allow-listed artifact character in `name`.
///
/// All other characters pass through untouched.
pub fn clean_display_name(name: &str) -> String {
    name.chars()
        .map(|c| if NAME_ARTIFACTS.contains(&c) { ARTIFACT_REPLACEMENT } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_are_replaced() {
        assert_eq!(clean_display_name("CafÂ© Coffee Day"), "Cafee Coffee Day");
        assert_eq!(clean_display_name("Caf\u{e9}"), "Cafe");
        assert_eq!(clean_display_name("Pizza Hut©"), "Pizza Hute");
    }

    #[test]
    fn test_other_characters_untouched() {
        assert_eq!(clean_display_name("Meghana Foods"), "Meghana Foods");
        assert_eq!(clean_display_name("Crème Brûlée"), "Crème Brûlee");
        assert_eq!(clean_display_name(""), "");
    }
}
