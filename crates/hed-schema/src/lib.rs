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

//! HED schema model and tag resolution.
//!
//! A [`Schema`] holds the sections of one schema version; a
//! [`SchemaGroup`] routes prefixed tags (`sc:Sleep-stage`) to library
//! schemas. Both are immutable after construction and safe to share
//! across threads.
//!
//! # Examples
//!
//! ```
//! use hed_schema::{SchemaBuilder, SchemaGroup};
//!
//! let schema = SchemaBuilder::new()
//!     .tag("Item", &["extensionAllowed"])
//!     .tag("Item/Object", &[])
//!     .tag("Item/Object/Vehicle", &[])
//!     .build()
//!     .unwrap();
//! let group = SchemaGroup::from(schema);
//!
//! let tag = group.resolve("Vehicle/Tricycle").unwrap();
//! assert_eq!(tag.long_tag(), "Item/Object/Vehicle/Tricycle");
//! assert_eq!(tag.short_tag(), "Vehicle/Tricycle");
//! ```

mod builder;
mod compliance;
mod entry;
mod group;
pub mod keys;
mod resolve;
mod schema;
mod units;

pub use builder::SchemaBuilder;
pub use compliance::ComplianceCheck;
pub use entry::{
    parse_attribute, AttributeDefinition, AttributeValue, EntryAttributes, SchemaEntry,
    SchemaSection, TagAttributes, UnitAttributes, UnitClassAttributes, UnitModifierAttributes,
    ValueClassAttributes,
};
pub use group::SchemaGroup;
pub use keys::SectionKey;
pub use schema::Schema;
pub use units::UnitSplit;
