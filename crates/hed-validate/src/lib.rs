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

//! Semantic validation of HED strings against a schema group.
//!
//! Passes run in a fixed order: per-tag checks ([`TagValidator`]), tree
//! checks ([`GroupValidator`]), definition references
//! ([`DefinitionTable`]), and, for whole documents, temporal assembly
//! ([`EventAssembler`]). Every pass returns owned issues; nothing here
//! mutates the schema, so one [`SchemaGroup`](hed_schema::SchemaGroup)
//! can back any number of parallel validations.

mod config;
mod definitions;
mod group_validator;
mod runner;
mod tag_validator;
mod temporal;

pub use config::{ValidatorConfig, MAX_ISSUES};
pub use definitions::{split_definition_value, Definition, DefinitionTable};
pub use group_validator::{definition_tag_indices, GroupValidator};
pub use runner::{canonicalize, DocumentReport, HedValidator};
pub use tag_validator::{is_definition_family, TagContext, TagValidator};
pub use temporal::{Assembly, EventAssembler, EventContents, EventState, Inset, TemporalEvent};
