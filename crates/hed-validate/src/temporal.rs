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

//! Temporal event assembly over ordered rows.
//!
//! Each top-level group of a row is inspected for one temporal tag, taken
//! in the order `Onset`, `Offset`, `Inset`, `Duration`. The anchor is the
//! group's `Def` tag or `Def-expand` subgroup, keyed by its lower-cased
//! `name[/value]`. Per anchor the state machine is `Open -> Closed` or
//! `Open -> Unmatched` at end of document. An `Onset` group that also
//! carries a `Duration` closes at once, like a bare `Duration` group.

use crate::definitions::{split_definition_value, DefinitionTable};
use hed_core::{HedError, HedGroup, HedNode, HedResult, HedTag, Issue, IssueKind, PLACEHOLDER};
use hed_schema::keys::special;
use hed_schema::SchemaGroup;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Lifecycle state of a [`TemporalEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Open,
    Closed,
    /// Still open at end of document.
    Unmatched,
}

/// What an event carries besides its anchor.
#[derive(Debug, Clone, PartialEq)]
pub enum EventContents {
    /// The onset group minus its temporal and anchor tags.
    Group(HedGroup),
    /// Nothing remained; the anchor name stands in.
    Anchor(String),
}

/// A sub-event recorded by `(Inset, Def/X)` while `X` is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Inset {
    pub index: usize,
    pub time: f64,
    pub contents: Option<HedGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemporalEvent {
    anchor: String,
    start_index: usize,
    start_time: f64,
    end_index: Option<usize>,
    end_time: Option<f64>,
    contents: EventContents,
    insets: Vec<Inset>,
    state: EventState,
}

impl TemporalEvent {
    /// Lower-cased `name[/value]` of the anchoring definition.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Row of the closing `Offset`; `None` for open and `Duration` events.
    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    pub fn contents(&self) -> &EventContents {
        &self.contents
    }

    pub fn insets(&self) -> &[Inset] {
        &self.insets
    }

    pub fn state(&self) -> EventState {
        self.state
    }
}

/// Result of a completed assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    /// Events in order of their start row.
    pub events: Vec<TemporalEvent>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temporal {
    Onset,
    Offset,
    Inset,
    Duration,
}

impl Temporal {
    const PRIORITY: [(Temporal, &'static str); 4] = [
        (Temporal::Onset, special::ONSET),
        (Temporal::Offset, special::OFFSET),
        (Temporal::Inset, special::INSET),
        (Temporal::Duration, special::DURATION),
    ];

    /// The highest-priority temporal tag among a group's direct tags.
    fn find(group: &HedGroup) -> Option<(Temporal, &HedTag)> {
        Self::PRIORITY
            .iter()
            .find_map(|(kind, name)| group.find_tag(|t| t.is_base(name)).map(|tag| (*kind, tag)))
    }
}

/// The anchor of a temporal group.
struct Anchor<'g> {
    key: String,
    tag: &'g HedTag,
}

/// Sequential state machine fed one row at a time.
#[derive(Debug)]
pub struct EventAssembler<'a> {
    table: &'a DefinitionTable,
    schemas: &'a SchemaGroup,
    events: Vec<TemporalEvent>,
    open: HashMap<String, usize>,
    issues: Vec<Issue>,
    last: Option<(usize, f64)>,
}

impl<'a> EventAssembler<'a> {
    pub fn new(table: &'a DefinitionTable, schemas: &'a SchemaGroup) -> Self {
        Self {
            table,
            schemas,
            events: Vec::new(),
            open: HashMap::new(),
            issues: Vec::new(),
            last: None,
        }
    }

    /// Feed one row. `root` must be canonicalized.
    ///
    /// Rows must arrive in non-decreasing index and time order.
    pub fn push(&mut self, index: usize, time: f64, root: &HedGroup) -> HedResult<()> {
        if !time.is_finite() {
            return Err(HedError::invalid_parameter(format!(
                "row {} has a non-finite time: {}",
                index, time
            )));
        }
        if let Some((last_index, last_time)) = self.last {
            if index < last_index || time < last_time {
                return Err(HedError::row_order(format!(
                    "row {} at {}s follows row {} at {}s",
                    index, time, last_index, last_time
                )));
            }
        }
        self.last = Some((index, time));

        for tag in root.tags() {
            if [special::ONSET, special::OFFSET, special::INSET]
                .iter()
                .any(|name| tag.is_base(name))
            {
                self.report(
                    index,
                    tag,
                    IssueKind::OnsetTagOutsideOfGroup,
                    format!("'{}' must be inside a group with its Def", tag.text()),
                );
            }
        }

        for group in root.groups() {
            if let Some((kind, temporal)) = Temporal::find(group) {
                self.process(index, time, kind, temporal, group);
            }
        }
        Ok(())
    }

    fn report(&mut self, row: usize, tag: &HedTag, kind: IssueKind, message: String) {
        self.issues.push(
            Issue::new(kind, message)
                .with_span(tag.span())
                .with_tag_index(tag.index())
                .with_row(row),
        );
    }

    fn process(&mut self, index: usize, time: f64, kind: Temporal, temporal: &HedTag, group: &HedGroup) {
        let Some(anchor) = self.anchor(index, temporal, group) else {
            return;
        };

        let others: Vec<&HedGroup> = group
            .groups()
            .filter(|g| g.find_tag(|t| t.is_base(special::DEF_EXPAND)).is_none())
            .collect();
        let allowed = if kind == Temporal::Offset { 0 } else { 1 };
        if others.len() > allowed {
            self.report(
                index,
                temporal,
                IssueKind::OnsetWrongNumberGroups,
                format!(
                    "'{}' group may hold at most {} contents group(s); found {}",
                    temporal.text(),
                    allowed,
                    others.len()
                ),
            );
            return;
        }

        trace!(row = index, anchor = %anchor.key, ?kind, "temporal group");
        match kind {
            Temporal::Onset => {
                if self.open.contains_key(&anchor.key) {
                    self.report(
                        index,
                        anchor.tag,
                        IssueKind::OnsetTooManyDefs,
                        format!("'{}' is already open", anchor.key),
                    );
                    return;
                }
                let mut event = self.new_event(&anchor.key, index, time, temporal, group);
                if let Some(duration) = group.find_tag(|t| t.is_base(special::DURATION)) {
                    // An onset with a duration is bounded on the spot.
                    let Some(seconds) = self.duration_seconds(duration) else {
                        debug!(row = index, tag = %duration, "duration without a numeric value");
                        return;
                    };
                    event.end_time = Some(time + seconds);
                    event.state = EventState::Closed;
                    self.events.push(event);
                    return;
                }
                self.open.insert(anchor.key, self.events.len());
                self.events.push(event);
            }
            Temporal::Offset => match self.open.remove(&anchor.key) {
                Some(slot) => {
                    let event = &mut self.events[slot];
                    event.end_index = Some(index);
                    event.end_time = Some(time);
                    event.state = EventState::Closed;
                }
                None => self.report(
                    index,
                    anchor.tag,
                    IssueKind::OffsetBeforeOnset,
                    format!("offset of '{}' without an open onset", anchor.key),
                ),
            },
            Temporal::Inset => match self.open.get(&anchor.key).copied() {
                Some(slot) => {
                    let contents = others.first().map(|g| (*g).clone());
                    self.events[slot].insets.push(Inset { index, time, contents });
                }
                None => self.report(
                    index,
                    anchor.tag,
                    IssueKind::InsetBeforeOnset,
                    format!("inset of '{}' without an open onset", anchor.key),
                ),
            },
            Temporal::Duration => {
                let Some(seconds) = self.duration_seconds(temporal) else {
                    debug!(row = index, tag = %temporal, "duration without a numeric value");
                    return;
                };
                let mut event = self.new_event(&anchor.key, index, time, temporal, group);
                event.end_time = Some(time + seconds);
                event.state = EventState::Closed;
                self.events.push(event);
            }
        }
    }

    /// Locate and check the group's single anchor.
    fn anchor<'g>(&mut self, index: usize, temporal: &HedTag, group: &'g HedGroup) -> Option<Anchor<'g>> {
        let mut anchors: Vec<&'g HedTag> = group.tags().filter(|t| t.is_base(special::DEF)).collect();
        anchors.extend(
            group
                .groups()
                .filter_map(|g| g.find_tag(|t| t.is_base(special::DEF_EXPAND))),
        );

        let tag = match anchors.as_slice() {
            [] => {
                self.report(
                    index,
                    temporal,
                    IssueKind::OnsetNoDefTagFound,
                    format!("'{}' group has no Def tag or Def-expand group", temporal.text()),
                );
                return None;
            }
            [tag] => *tag,
            [_, extra, ..] => {
                let extra = *extra;
                self.report(
                    index,
                    extra,
                    IssueKind::OnsetTooManyDefs,
                    format!("'{}' group has more than one Def", temporal.text()),
                );
                return None;
            }
        };

        let value = tag.canonical().and_then(|c| c.value()).unwrap_or_default();
        let (name, bound) = split_definition_value(value);
        let table = self.table;
        let Some(definition) = table.get(name) else {
            self.report(
                index,
                tag,
                IssueKind::OnsetDefUnmatched,
                format!("'{}' does not name a known definition", tag.text()),
            );
            return None;
        };

        let placeholder = bound.map_or(false, |b| b.contains(PLACEHOLDER));
        if placeholder || definition.takes_value() != bound.is_some() {
            self.report(
                index,
                tag,
                IssueKind::OnsetPlaceholderWrong,
                format!(
                    "'{}' does not match the value arity of definition '{}'",
                    tag.text(),
                    definition.display_name()
                ),
            );
            return None;
        }

        Some(Anchor {
            key: value.to_lowercase(),
            tag,
        })
    }

    fn new_event(
        &self,
        anchor: &str,
        index: usize,
        time: f64,
        temporal: &HedTag,
        group: &HedGroup,
    ) -> TemporalEvent {
        let remaining: Vec<HedNode> = group
            .children()
            .iter()
            .filter(|child| match child {
                HedNode::Tag(tag) => {
                    tag.index() != temporal.index()
                        && !tag.is_base(special::DEF)
                        && !tag.is_base(special::DURATION)
                }
                HedNode::Group(inner) => inner.find_tag(|t| t.is_base(special::DEF_EXPAND)).is_none(),
            })
            .cloned()
            .collect();
        let contents = if remaining.is_empty() {
            EventContents::Anchor(anchor.to_string())
        } else {
            EventContents::Group(HedGroup::with_children(remaining).with_span(group.span()))
        };
        TemporalEvent {
            anchor: anchor.to_string(),
            start_index: index,
            start_time: time,
            end_index: None,
            end_time: None,
            contents,
            insets: Vec::new(),
            state: EventState::Open,
        }
    }

    fn duration_seconds(&self, tag: &HedTag) -> Option<f64> {
        let canonical = tag.canonical()?;
        let schema = self.schemas.schema_for(canonical)?;
        schema.value_in_base_units(&canonical.long_base, canonical.value()?)
    }

    /// Close out the document; events still open become unmatched.
    pub fn finish(mut self) -> Assembly {
        let mut open: Vec<usize> = self.open.into_values().collect();
        open.sort_unstable();
        for slot in open {
            let event = &mut self.events[slot];
            event.state = EventState::Unmatched;
            self.issues.push(
                Issue::new(
                    IssueKind::OnsetUnmatched,
                    format!("onset of '{}' is never closed", event.anchor),
                )
                .with_row(event.start_index),
            );
        }
        debug!(
            events = self.events.len(),
            issues = self.issues.len(),
            "temporal assembly finished"
        );
        Assembly {
            events: self.events,
            issues: self.issues,
        }
    }
}
