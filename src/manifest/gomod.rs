use regex::Regex;

use crate::manifest::{ManifestError, ManifestParser, ManifestPattern};

const SKIPPED_DIRECTIVES: &[&str] = &["replace", "exclude", "retract"];

pub struct GoModParser {
    pattern: ManifestPattern,
    candidate: String,
    line_re: Regex,
}

impl GoModParser {
    pub fn new(pattern: ManifestPattern) -> Result<Self, ManifestError> {
        let line_re = Regex::new(&format!(
            r"^{}/({}-[a-z\-]*) v[0-9][0-9.]*(?:\s+//.*)?$",
            regex::escape(&pattern.registry),
            regex::escape(&pattern.service_prefix),
        ))?;
        Ok(Self {
            candidate: pattern.candidate_prefix(),
            pattern,
            line_re,
        })
    }

    pub fn pattern(&self) -> &ManifestPattern {
        &self.pattern
    }

    fn directive(line: &str) -> Option<&str> {
        let word = line.split_whitespace().next()?;
        SKIPPED_DIRECTIVES.iter().copied().find(|d| *d == word)
    }

    fn opens_block(line: &str, directive: &str) -> bool {
        line.trim_start_matches(directive).trim() == "("
    }
}

impl ManifestParser for GoModParser {
    fn referenced_services(&self, content: &[u8]) -> Result<Vec<String>, ManifestError> {
        let text = std::str::from_utf8(content)?;
        let mut deps = Vec::new();
        let mut in_skipped_block = false;

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if in_skipped_block {
                if trimmed.starts_with(')') {
                    in_skipped_block = false;
                }
                continue;
            }
            if let Some(directive) = Self::directive(trimmed) {
                in_skipped_block = Self::opens_block(trimmed, directive);
                continue;
            }

            let declaration = match trimmed.strip_prefix("require") {
                Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
                _ => trimmed,
            };
            if !declaration.starts_with(&self.candidate) {
                continue;
            }

            let captures =
                self.line_re
                    .captures(declaration)
                    .ok_or_else(|| ManifestError::Malformed {
                        line: idx + 1,
                        content: line.to_string(),
                    })?;
            deps.push(captures[1].to_string());
        }

        Ok(deps)
    }
}
