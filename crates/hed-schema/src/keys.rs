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

//! Section keys and well-known attribute names.

use hed_core::{HedError, HedResult};
use std::fmt;

/// Named sections of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    Tags,
    UnitClasses,
    Units,
    UnitModifiers,
    ValueClasses,
    Attributes,
    Properties,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Tags,
        SectionKey::UnitClasses,
        SectionKey::Units,
        SectionKey::UnitModifiers,
        SectionKey::ValueClasses,
        SectionKey::Attributes,
        SectionKey::Properties,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            SectionKey::Tags => "tags",
            SectionKey::UnitClasses => "unitClasses",
            SectionKey::Units => "units",
            SectionKey::UnitModifiers => "unitModifiers",
            SectionKey::ValueClasses => "valueClasses",
            SectionKey::Attributes => "attributes",
            SectionKey::Properties => "properties",
        }
    }

    /// Look up a section by its name. Unknown names are an API error.
    pub fn from_name(name: &str) -> HedResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == name)
            .ok_or_else(|| HedError::unknown_section(format!("no schema section named '{}'", name)))
    }

    /// Only the tag section folds case for lookup.
    pub const fn is_case_sensitive(&self) -> bool {
        !matches!(self, SectionKey::Tags)
    }

    /// The attribute property that makes an attribute legal in this section.
    pub const fn attribute_property(&self) -> Option<&'static str> {
        match self {
            SectionKey::UnitClasses => Some(property::UNIT_CLASS),
            SectionKey::Units => Some(property::UNIT),
            SectionKey::UnitModifiers => Some(property::UNIT_MODIFIER),
            SectionKey::ValueClasses => Some(property::VALUE_CLASS),
            SectionKey::Tags | SectionKey::Attributes | SectionKey::Properties => None,
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute names as they appear in schema sources.
pub mod attr {
    pub const EXTENSION_ALLOWED: &str = "extensionAllowed";
    pub const RECOMMENDED: &str = "recommended";
    pub const REQUIRED: &str = "required";
    pub const REQUIRE_CHILD: &str = "requireChild";
    pub const TAG_GROUP: &str = "tagGroup";
    pub const TAKES_VALUE: &str = "takesValue";
    pub const TOP_LEVEL_TAG_GROUP: &str = "topLevelTagGroup";
    pub const UNIQUE: &str = "unique";
    pub const UNIT_CLASS: &str = "unitClass";
    pub const VALUE_CLASS: &str = "valueClass";
    pub const RELATED_TAG: &str = "relatedTag";
    pub const SUGGESTED_TAG: &str = "suggestedTag";

    pub const DEFAULT_UNITS: &str = "defaultUnits";

    pub const SI_UNIT: &str = "SIUnit";
    pub const UNIT_SYMBOL: &str = "unitSymbol";
    pub const UNIT_PREFIX: &str = "unitPrefix";
    pub const CONVERSION_FACTOR: &str = "conversionFactor";

    pub const SI_UNIT_MODIFIER: &str = "SIUnitModifier";
    pub const SI_UNIT_SYMBOL_MODIFIER: &str = "SIUnitSymbolModifier";

    pub const ALLOWED_CHARACTER: &str = "allowedCharacter";
}

/// Attribute properties: which section an attribute applies to.
pub mod property {
    pub const BOOL: &str = "boolProperty";
    pub const UNIT_CLASS: &str = "unitClassProperty";
    pub const UNIT: &str = "unitProperty";
    pub const UNIT_MODIFIER: &str = "unitModifierProperty";
    pub const VALUE_CLASS: &str = "valueClassProperty";
}

/// Tag short names with special meaning to the validators.
pub mod special {
    pub const DEFINITION: &str = "Definition";
    pub const DEF: &str = "Def";
    pub const DEF_EXPAND: &str = "Def-expand";
    pub const ONSET: &str = "Onset";
    pub const OFFSET: &str = "Offset";
    pub const INSET: &str = "Inset";
    pub const DURATION: &str = "Duration";
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::HedErrorKind;

    #[test]
    fn test_from_name() {
        assert_eq!(SectionKey::from_name("unitClasses").unwrap(), SectionKey::UnitClasses);
        let err = SectionKey::from_name("bogus").unwrap_err();
        assert_eq!(err.kind, HedErrorKind::UnknownSection);
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(!SectionKey::Tags.is_case_sensitive());
        assert!(SectionKey::Units.is_case_sensitive());
    }
}
