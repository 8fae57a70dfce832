// HED Tools - Hierarchical Event Descriptor validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Unit and value-class checking for tag values.

use crate::entry::SchemaEntry;
use crate::schema::Schema;
use hed_core::{Issue, IssueKind, Span};

/// How a value split against a node's unit classes.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitSplit<'a> {
    /// A unit was recognised; `factor` converts the magnitude to base units.
    Matched { magnitude: &'a str, unit: &'a str, factor: f64 },
    /// No unit token; `default` is the class default and its factor, if any.
    Bare {
        magnitude: &'a str,
        default: Option<(String, f64)>,
    },
    /// A trailing token that is not a legal unit.
    Unknown { magnitude: &'a str, token: &'a str, token_start: usize },
}

/// Plural form used for word units.
fn plural(word: &str) -> String {
    if word == "foot" {
        return "feet".to_string();
    }
    if word.ends_with('z') {
        return word.to_string();
    }
    if ["s", "x", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
        return format!("{}es", word);
    }
    let bytes = word.as_bytes();
    if word.len() > 1
        && word.ends_with('y')
        && !b"aeiou".contains(&bytes[bytes.len() - 2])
    {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    format!("{}s", word)
}

fn is_numeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// `YYYY-MM-DDThh:mm[:ss[.fff]]`, date alone, or time alone.
fn is_date_time(text: &str) -> bool {
    fn digits(part: &str, len: usize) -> bool {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    }
    fn date(part: &str) -> bool {
        let pieces: Vec<_> = part.split('-').collect();
        pieces.len() == 3 && digits(pieces[0], 4) && digits(pieces[1], 2) && digits(pieces[2], 2)
    }
    fn time(part: &str) -> bool {
        let (main, fraction) = match part.split_once('.') {
            Some((main, fraction)) => (main, Some(fraction)),
            None => (part, None),
        };
        let pieces: Vec<_> = main.split(':').collect();
        (2..=3).contains(&pieces.len())
            && pieces.iter().all(|p| digits(p, 2))
            && fraction.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
    }
    match text.split_once('T') {
        Some((d, t)) => date(d) && time(t),
        None => date(text) || time(text),
    }
}

fn allowed_character(spec: &str, c: char) -> bool {
    match spec {
        "letters" => c.is_alphabetic(),
        "digits" => c.is_ascii_digit(),
        "blank" => c == ' ',
        "hyphen" => c == '-',
        "underscore" => c == '_',
        "period" => c == '.',
        "comma" => c == ',',
        "colon" => c == ':',
        "slash" => c == '/',
        "nonascii" => !c.is_ascii(),
        other => other.chars().count() == 1 && other.starts_with(c),
    }
}

impl Schema {
    /// True if `value` satisfies the value class.
    pub fn value_matches_class(&self, class: &SchemaEntry, value: &str) -> bool {
        match class.long_name() {
            "numericClass" => return is_numeric(value),
            "dateTimeClass" => return is_date_time(value),
            _ => {}
        }
        if value.chars().any(char::is_control) {
            return false;
        }
        let allowed = class
            .value_class()
            .map(|v| v.allowed_characters.as_slice())
            .unwrap_or_default();
        allowed.is_empty()
            || value
                .chars()
                .all(|c| allowed.iter().any(|spec| allowed_character(spec, c)))
    }

    /// Conversion factor for `token` within one unit class.
    fn match_unit(&self, class_name: &str, token: &str) -> Option<f64> {
        let lowered = token.to_lowercase();
        for unit in self.units_of_class(class_name) {
            let Some(attrs) = unit.unit() else { continue };
            if attrs.unit_prefix {
                continue;
            }
            let name = unit.long_name();
            let base = attrs.conversion_factor.unwrap_or(1.0);
            if attrs.unit_symbol {
                if token == name {
                    return Some(base);
                }
                if attrs.si_unit {
                    for modifier in self.unit_modifiers() {
                        let Some(m) = modifier.unit_modifier() else { continue };
                        if m.si_unit_symbol_modifier
                            && token.strip_prefix(modifier.long_name()) == Some(name)
                        {
                            return Some(base * m.conversion_factor.unwrap_or(1.0));
                        }
                    }
                }
            } else {
                let word = name.to_lowercase();
                let forms = [word.clone(), plural(&word)];
                if forms.contains(&lowered) {
                    return Some(base);
                }
                if attrs.si_unit {
                    for modifier in self.unit_modifiers() {
                        let Some(m) = modifier.unit_modifier() else { continue };
                        if !m.si_unit_modifier {
                            continue;
                        }
                        let prefix = modifier.long_name().to_lowercase();
                        if let Some(rest) = lowered.strip_prefix(prefix.as_str()) {
                            if forms.iter().any(|f| f == rest) {
                                return Some(base * m.conversion_factor.unwrap_or(1.0));
                            }
                        }
                    }
                }
            }
        }
        None
    }

    /// Split a value into magnitude and unit against the node's unit classes.
    ///
    /// Returns `None` when the node has no unit class.
    pub fn split_units<'a>(&self, long_name: &str, value: &'a str) -> Option<UnitSplit<'a>> {
        let classes = self.unit_classes_for(long_name);
        if classes.is_empty() {
            return None;
        }

        for class in &classes {
            for unit in self.units_of_class(class.long_name()) {
                let Some(attrs) = unit.unit() else { continue };
                if !attrs.unit_prefix {
                    continue;
                }
                if let Some(rest) = value.strip_prefix(unit.long_name()) {
                    return Some(UnitSplit::Matched {
                        magnitude: rest.trim(),
                        unit: &value[..unit.long_name().len()],
                        factor: attrs.conversion_factor.unwrap_or(1.0),
                    });
                }
            }
        }

        let trimmed = value.trim_end();
        if let Some(idx) = trimmed.rfind(char::is_whitespace) {
            let magnitude = trimmed[..idx].trim();
            let token_start = idx + trimmed[idx..].chars().next().map_or(1, char::len_utf8);
            let token = &trimmed[token_start..];
            for class in &classes {
                if let Some(factor) = self.match_unit(class.long_name(), token) {
                    return Some(UnitSplit::Matched {
                        magnitude,
                        unit: token,
                        factor,
                    });
                }
            }
            return Some(UnitSplit::Unknown {
                magnitude,
                token,
                token_start,
            });
        }

        let default = classes.iter().find_map(|class| {
            let name = class.unit_class()?.default_units.clone()?;
            let factor = self
                .units
                .get(&name)
                .and_then(|u| u.unit())
                .and_then(|u| u.conversion_factor)
                .unwrap_or(1.0);
            Some((name, factor))
        });
        Some(UnitSplit::Bare {
            magnitude: trimmed,
            default,
        })
    }

    /// Sorted names of every unit legal for the node.
    pub fn legal_units(&self, long_name: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .unit_classes_for(long_name)
            .iter()
            .flat_map(|class| self.units_of_class(class.long_name()))
            .map(|unit| unit.long_name().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn magnitude_valid(&self, long_name: &str, magnitude: &str) -> bool {
        let classes = self.value_classes_for(long_name);
        classes.is_empty() || classes.iter().any(|class| self.value_matches_class(class, magnitude))
    }

    /// Check the value of a value-taking node.
    ///
    /// Issue spans are relative to `value`.
    pub fn check_value(&self, long_name: &str, value: &str) -> Vec<Issue> {
        let whole = Span::new(0, value.len());
        let invalid_value = |text: &str| {
            Issue::new(
                IssueKind::ValueInvalid,
                format!("'{}' is not a valid value for '{}'", text, long_name),
            )
            .with_span(whole)
        };

        match self.split_units(long_name, value) {
            None => {
                if self.magnitude_valid(long_name, value) {
                    Vec::new()
                } else {
                    vec![invalid_value(value)]
                }
            }
            Some(UnitSplit::Matched { magnitude, .. }) => {
                if self.magnitude_valid(long_name, magnitude) {
                    Vec::new()
                } else {
                    vec![invalid_value(magnitude)]
                }
            }
            Some(UnitSplit::Unknown { token, token_start, .. }) => vec![Issue::new(
                IssueKind::UnitsInvalid,
                format!(
                    "'{}' is not a legal unit for '{}'; legal units are: {}",
                    token,
                    long_name,
                    self.legal_units(long_name).join(", ")
                ),
            )
            .with_span(Span::new(token_start, token_start + token.len()))],
            Some(UnitSplit::Bare { magnitude, default }) => {
                if !self.magnitude_valid(long_name, magnitude) {
                    return vec![invalid_value(magnitude)];
                }
                match default {
                    Some((unit, _)) => vec![Issue::new(
                        IssueKind::UnitsDefaultUsed,
                        format!("No unit given for '{}'; default unit '{}' used", value, unit),
                    )
                    .with_span(whole)],
                    None => Vec::new(),
                }
            }
        }
    }

    /// Numeric value converted to the base unit of its class (seconds for time).
    ///
    /// ```
    /// use hed_schema::SchemaBuilder;
    ///
    /// let schema = SchemaBuilder::new()
    ///     .tag("Duration", &[])
    ///     .tag("Duration/#", &["unitClass=timeUnits"])
    ///     .unit_class("timeUnits", &["defaultUnits=s"])
    ///     .unit("timeUnits", "s", &["SIUnit", "unitSymbol", "conversionFactor=1.0"])
    ///     .unit_modifier("m", &["SIUnitSymbolModifier", "conversionFactor=0.001"])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(schema.value_in_base_units("Duration", "2 ms"), Some(0.002));
    /// assert_eq!(schema.value_in_base_units("Duration", "4"), Some(4.0));
    /// ```
    pub fn value_in_base_units(&self, long_name: &str, value: &str) -> Option<f64> {
        let (magnitude, factor) = match self.split_units(long_name, value)? {
            UnitSplit::Matched { magnitude, factor, .. } => (magnitude, factor),
            UnitSplit::Bare { magnitude, default } => {
                (magnitude, default.map(|(_, f)| f).unwrap_or(1.0))
            }
            UnitSplit::Unknown { .. } => return None,
        };
        magnitude
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaBuilder;

    fn schema() -> Schema {
        SchemaBuilder::new()
            .tag("Duration", &[])
            .tag("Duration/#", &["unitClass=timeUnits", "valueClass=numericClass"])
            .tag("Frequency", &[])
            .tag("Frequency/#", &["unitClass=frequencyUnits", "valueClass=numericClass"])
            .tag("Cost", &[])
            .tag("Cost/#", &["unitClass=currencyUnits", "valueClass=numericClass"])
            .tag("Label", &[])
            .tag("Label/#", &["valueClass=nameClass"])
            .unit_class("timeUnits", &["defaultUnits=s"])
            .unit("timeUnits", "s", &["SIUnit", "unitSymbol", "conversionFactor=1.0"])
            .unit("timeUnits", "second", &["SIUnit", "conversionFactor=1.0"])
            .unit("timeUnits", "minute", &["conversionFactor=60.0"])
            .unit("timeUnits", "day", &["conversionFactor=86400.0"])
            .unit_class("frequencyUnits", &["defaultUnits=Hz"])
            .unit("frequencyUnits", "Hz", &["SIUnit", "unitSymbol"])
            .unit("frequencyUnits", "hertz", &["SIUnit"])
            .unit_class("currencyUnits", &["defaultUnits=$"])
            .unit("currencyUnits", "$", &["unitPrefix", "unitSymbol"])
            .unit_modifier("m", &["SIUnitSymbolModifier", "conversionFactor=0.001"])
            .unit_modifier("k", &["SIUnitSymbolModifier", "conversionFactor=1000.0"])
            .unit_modifier("milli", &["SIUnitModifier", "conversionFactor=0.001"])
            .value_class("numericClass", &[])
            .value_class("nameClass", &["allowedCharacter=letters,digits,hyphen,underscore"])
            .build()
            .unwrap()
    }

    fn kinds(schema: &Schema, long: &str, value: &str) -> Vec<IssueKind> {
        schema.check_value(long, value).iter().map(Issue::kind).collect()
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural("day"), "days");
        assert_eq!(plural("hertz"), "hertz");
        assert_eq!(plural("inch"), "inches");
        assert_eq!(plural("foot"), "feet");
        assert_eq!(plural("century"), "centuries");
    }

    #[test]
    fn test_symbol_units_are_case_sensitive() {
        let schema = schema();
        assert!(kinds(&schema, "Duration", "3 ms").is_empty());
        assert!(kinds(&schema, "Frequency", "20 kHz").is_empty());
        assert_eq!(kinds(&schema, "Frequency", "20 hz"), vec![IssueKind::UnitsInvalid]);
    }

    #[test]
    fn test_word_units_fold_case_and_plural() {
        let schema = schema();
        assert!(kinds(&schema, "Duration", "2 Minutes").is_empty());
        assert!(kinds(&schema, "Duration", "5 milliseconds").is_empty());
        assert!(kinds(&schema, "Frequency", "3 Hertz").is_empty());
    }

    #[test]
    fn test_default_unit_used() {
        let schema = schema();
        let issues = schema.check_value("Duration", "3");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind(), IssueKind::UnitsDefaultUsed);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_invalid_unit_lists_legal_units() {
        let schema = schema();
        let issues = schema.check_value("Duration", "3 cm");
        assert_eq!(issues[0].kind(), IssueKind::UnitsInvalid);
        assert_eq!(issues[0].span(), Some(Span::new(2, 4)));
        assert!(issues[0].message().ends_with("day, minute, s, second"));
    }

    #[test]
    fn test_prefix_unit() {
        let schema = schema();
        assert!(kinds(&schema, "Cost", "$25.99").is_empty());
        assert_eq!(kinds(&schema, "Cost", "$abc"), vec![IssueKind::ValueInvalid]);
    }

    #[test]
    fn test_value_classes() {
        let schema = schema();
        assert!(kinds(&schema, "Label", "My_label-2").is_empty());
        assert_eq!(kinds(&schema, "Label", "My label"), vec![IssueKind::ValueInvalid]);
        assert_eq!(kinds(&schema, "Duration", "abc"), vec![IssueKind::ValueInvalid]);
        assert_eq!(kinds(&schema, "Duration", "inf"), vec![IssueKind::ValueInvalid]);
    }

    #[test]
    fn test_base_unit_conversion() {
        let schema = schema();
        assert_eq!(schema.value_in_base_units("Duration", "2 minute"), Some(120.0));
        assert_eq!(schema.value_in_base_units("Duration", "1.5 day"), Some(129600.0));
        assert_eq!(schema.value_in_base_units("Duration", "3 cm"), None);
        assert_eq!(schema.value_in_base_units("Label", "3"), None);
    }

    #[test]
    fn test_date_time() {
        assert!(is_date_time("2022-01-31T08:30:00.5"));
        assert!(is_date_time("08:30"));
        assert!(!is_date_time("8:30"));
        assert!(!is_date_time("2022-1-31"));
    }
}
