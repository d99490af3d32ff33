//! Effect include discovery
//!
//! Scans effect source for string literals naming include files. Comments
//! are skipped, so a commented-out include is not a dependency. Literals
//! nested inside other literals through escaped quotes
//! (`"#pragma include \"light.glsl\""`) are found as well.

/// List the string literals of `source` that end with `marker`
///
/// Paths are returned in order of first appearance, without duplicates.
pub fn parse_includes(source: &str, marker: &str) -> Vec<String> {
    let mut includes = Vec::new();
    if !marker.is_empty() {
        collect_includes(source, marker, &mut includes);
    }
    includes
}

fn collect_includes(source: &str, marker: &str, includes: &mut Vec<String>) {
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for c in chars.by_ref() {
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
            }
            '"' => {
                let mut literal = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                literal.push(escaped);
                            }
                        }
                        _ => literal.push(c),
                    }
                }

                if literal.ends_with(marker) && !includes.contains(&literal) {
                    includes.push(literal.clone());
                }
                collect_includes(&literal, marker, includes);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_includes_in_string_literals() {
        let source = r##"{
            "name": "phong",
            "passes": [{
                "vertexShader": "#pragma include \"phong.vertex.glsl\"",
                "fragmentShader": "light.glsl"
            }]
        }"##;

        assert_eq!(
            parse_includes(source, ".glsl"),
            vec!["phong.vertex.glsl".to_string(), "light.glsl".to_string()]
        );
    }

    #[test]
    fn test_nested_literal() {
        let source = r##""#pragma include \"shadow.glsl\"" "skin.glsl""##;
        assert_eq!(
            parse_includes(source, ".glsl"),
            vec!["shadow.glsl".to_string(), "skin.glsl".to_string()]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = r##"
            // "old.glsl"
            /* "disabled.glsl" */
            "kept.glsl"
        "##;
        assert_eq!(parse_includes(source, ".glsl"), vec!["kept.glsl".to_string()]);
    }

    #[test]
    fn test_duplicates_and_other_extensions() {
        let source = r##""a.glsl" "b.png" "a.glsl" "c.glsl.bak""##;
        assert_eq!(parse_includes(source, ".glsl"), vec!["a.glsl".to_string()]);
        assert!(parse_includes(source, "").is_empty());
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(
            parse_includes("\"open.glsl", ".glsl"),
            vec!["open.glsl".to_string()]
        );
    }
}
